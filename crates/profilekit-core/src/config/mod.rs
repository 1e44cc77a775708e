//! Client configuration and keyed lookup.
//!
//! `AppConfig` is persisted as JSON under the user config directory and can be
//! overridden from the environment. Screens read individual values through
//! [`ConfigLookup`] using dotted keys such as `services.cloudinary.preset`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::SeedDefaults;
use crate::util::non_blank;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

pub const UPLOAD_PRESET_KEY: &str = "services.cloudinary.preset";
pub const CLOUD_NAME_KEY: &str = "services.cloudinary.cloud_name";
pub const API_BASE_URL_KEY: &str = "api.base_url";
pub const ACCESS_TOKEN_KEY: &str = "api.access_token";
pub const DEFAULT_LONGITUDE_KEY: &str = "profile.default_longitude";
pub const DEFAULT_LATITUDE_KEY: &str = "profile.default_latitude";

const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("PROFILEKIT_API_BASE_URL", API_BASE_URL_KEY),
    ("PROFILEKIT_ACCESS_TOKEN", ACCESS_TOKEN_KEY),
    ("PROFILEKIT_CLOUDINARY_CLOUD_NAME", CLOUD_NAME_KEY),
    ("PROFILEKIT_CLOUDINARY_PRESET", UPLOAD_PRESET_KEY),
    ("PROFILEKIT_DEFAULT_LONGITUDE", DEFAULT_LONGITUDE_KEY),
    ("PROFILEKIT_DEFAULT_LATITUDE", DEFAULT_LATITUDE_KEY),
];

/// Keyed, read-only configuration access.
pub trait ConfigLookup: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`ConfigLookup::get`] but a missing value is an error.
    fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| Error::Config(format!("'{key}' is not configured")))
    }

    /// Coordinates seeded into new drafts when the user record has none.
    fn seed_defaults(&self) -> SeedDefaults {
        let fallback = SeedDefaults::default();
        SeedDefaults {
            longitude: self
                .get(DEFAULT_LONGITUDE_KEY)
                .unwrap_or(fallback.longitude),
            latitude: self.get(DEFAULT_LATITUDE_KEY).unwrap_or(fallback.latitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub profile: ProfileDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default)]
    pub default_longitude: Option<String>,
    #[serde(default)]
    pub default_latitude: Option<String>,
}

const fn default_config_version() -> u32 {
    CONFIG_VERSION
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: ApiConfig::default(),
            services: ServicesConfig::default(),
            profile: ProfileDefaults::default(),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("profilekit").join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("failed to resolve the user config directory".to_string()))
}

impl AppConfig {
    /// Load from `path`; a missing file yields the default configuration.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!("failed to parse {}: {error}", path.display()))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    /// Apply `PROFILEKIT_*` overrides read through `env`.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        for (variable, key) in ENV_OVERRIDES {
            if let Some(value) = non_blank(env(variable).as_deref()) {
                // Keys in ENV_OVERRIDES are all settable.
                let _ = self.set(key, Some(value));
            }
        }
    }

    /// Assign a value by dotted key. Blank values clear the entry.
    pub fn set(&mut self, key: &str, value: Option<String>) -> Result<()> {
        let value = non_blank(value.as_deref());
        let slot = match key {
            API_BASE_URL_KEY => &mut self.api.base_url,
            ACCESS_TOKEN_KEY => &mut self.api.access_token,
            CLOUD_NAME_KEY => &mut self.services.cloudinary.cloud_name,
            UPLOAD_PRESET_KEY => &mut self.services.cloudinary.preset,
            DEFAULT_LONGITUDE_KEY => &mut self.profile.default_longitude,
            DEFAULT_LATITUDE_KEY => &mut self.profile.default_latitude,
            other => return Err(Error::Config(format!("unknown configuration key '{other}'"))),
        };
        *slot = value;
        Ok(())
    }

    fn normalize(&mut self) {
        for slot in [
            &mut self.api.base_url,
            &mut self.api.access_token,
            &mut self.services.cloudinary.cloud_name,
            &mut self.services.cloudinary.preset,
            &mut self.profile.default_longitude,
            &mut self.profile.default_latitude,
        ] {
            *slot = non_blank(slot.as_deref());
        }
        if let Some(base_url) = self.api.base_url.as_mut() {
            let trimmed = base_url.trim_end_matches('/').len();
            base_url.truncate(trimmed);
        }
    }
}

impl ConfigLookup for AppConfig {
    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            API_BASE_URL_KEY => self.api.base_url.as_deref(),
            ACCESS_TOKEN_KEY => self.api.access_token.as_deref(),
            CLOUD_NAME_KEY => self.services.cloudinary.cloud_name.as_deref(),
            UPLOAD_PRESET_KEY => self.services.cloudinary.preset.as_deref(),
            DEFAULT_LONGITUDE_KEY => self.profile.default_longitude.as_deref(),
            DEFAULT_LATITUDE_KEY => self.profile.default_latitude.as_deref(),
            _ => None,
        };
        non_blank(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "profilekit-config-test-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |duration| duration.as_nanos())
        ))
    }

    #[test]
    fn lookup_resolves_dotted_keys() {
        let mut config = AppConfig::default();
        config.set(UPLOAD_PRESET_KEY, Some(" unsigned ".to_string())).unwrap();

        assert_eq!(config.get("services.cloudinary.preset").as_deref(), Some("unsigned"));
        assert_eq!(config.get("services.cloudinary.cloud_name"), None);
        assert_eq!(config.get("services.unknown"), None);
        assert!(config.require(CLOUD_NAME_KEY).is_err());
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut config = AppConfig::default();
        assert!(config.set("services.s3.bucket", Some("x".to_string())).is_err());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.services.cloudinary.preset = Some("from-file".to_string());
        let env = HashMap::from([
            ("PROFILEKIT_CLOUDINARY_PRESET", "from-env"),
            ("PROFILEKIT_API_BASE_URL", "   "),
        ]);

        config.apply_env(|name| env.get(name).map(ToString::to_string));

        assert_eq!(config.get(UPLOAD_PRESET_KEY).as_deref(), Some("from-env"));
        assert_eq!(config.get(API_BASE_URL_KEY), None);
    }

    #[test]
    fn seed_defaults_fall_back_to_placeholders() {
        let mut config = AppConfig::default();
        assert_eq!(config.seed_defaults(), SeedDefaults::default());

        config.profile.default_latitude = Some("6.5".to_string());
        assert_eq!(config.seed_defaults().latitude, "6.5");
    }

    #[test]
    fn config_roundtrip_normalizes_values() {
        let path = temp_config_path();
        let mut config = AppConfig::default();
        config.api.base_url = Some(" https://api.example.com/ ".to_string());
        config.services.cloudinary.cloud_name = Some("demo".to_string());
        config.services.cloudinary.preset = Some("  ".to_string());

        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();

        assert_eq!(loaded.api.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(loaded.services.cloudinary.cloud_name.as_deref(), Some("demo"));
        assert_eq!(loaded.services.cloudinary.preset, None);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = AppConfig::load_from_path(&temp_config_path()).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }
}
