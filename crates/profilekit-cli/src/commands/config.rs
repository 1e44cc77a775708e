use std::path::Path;

use profilekit_core::config::{
    AppConfig, ConfigLookup, ACCESS_TOKEN_KEY, API_BASE_URL_KEY, CLOUD_NAME_KEY,
    DEFAULT_LATITUDE_KEY, DEFAULT_LONGITUDE_KEY, UPLOAD_PRESET_KEY,
};
use profilekit_core::util::normalize_base_url;

use crate::cli::ConfigCommands;
use crate::commands::common::{load_config, resolve_config_path};
use crate::error::CliError;

pub fn run_config(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            access_token,
            cloud_name,
            upload_preset,
            default_longitude,
            default_latitude,
        } => {
            let path = resolve_config_path(config_path)?;
            let mut config = AppConfig::load_from_path(&path)?;
            apply_init(
                &mut config,
                [
                    (API_BASE_URL_KEY, api_base_url),
                    (ACCESS_TOKEN_KEY, access_token),
                    (CLOUD_NAME_KEY, cloud_name),
                    (UPLOAD_PRESET_KEY, upload_preset),
                    (DEFAULT_LONGITUDE_KEY, default_longitude),
                    (DEFAULT_LATITUDE_KEY, default_latitude),
                ],
            )?;
            config.save_to_path(&path)?;
            println!("Saved configuration to {}", path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            for line in format_config_lines(&config) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Merge explicitly passed values into `config`; omitted flags keep what is stored.
pub fn apply_init<const N: usize>(
    config: &mut AppConfig,
    values: [(&str, Option<String>); N],
) -> Result<(), CliError> {
    for (key, value) in values {
        let Some(value) = value else {
            continue;
        };
        let value = if key == API_BASE_URL_KEY {
            normalize_base_url(&value)?
        } else {
            value
        };
        config.set(key, Some(value))?;
    }
    Ok(())
}

pub fn format_config_lines(config: &AppConfig) -> Vec<String> {
    [
        API_BASE_URL_KEY,
        ACCESS_TOKEN_KEY,
        CLOUD_NAME_KEY,
        UPLOAD_PRESET_KEY,
        DEFAULT_LONGITUDE_KEY,
        DEFAULT_LATITUDE_KEY,
    ]
    .into_iter()
    .map(|key| {
        let value = match config.get(key) {
            Some(_) if key == ACCESS_TOKEN_KEY => "[REDACTED]".to_string(),
            Some(value) => value,
            None => "(unset)".to_string(),
        };
        format!("{key} = {value}")
    })
    .collect()
}
