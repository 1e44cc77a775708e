use std::path::Path;

use crate::commands::common::{account_api, fetch_account, format_account_lines, load_config};
use crate::error::CliError;

pub async fn run_show(config_path: Option<&Path>, as_json: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let api = account_api(&config)?;
    let user = fetch_account(&api).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        for line in format_account_lines(&user) {
            println!("{line}");
        }
    }

    Ok(())
}
