use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] profilekit_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid field assignment '{0}', expected FIELD=VALUE")]
    InvalidAssignment(String),
    #[error("Account fetch failed: {0}")]
    AccountUnavailable(String),
    #[error(
        "Account API is not configured. Run `profilekit config init --api-base-url <URL> --access-token <TOKEN>` or set PROFILEKIT_API_BASE_URL and PROFILEKIT_ACCESS_TOKEN."
    )]
    ApiNotConfigured,
}
