//! Error types for profilekit-core

use thiserror::Error;

/// Result type alias using profilekit-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in profilekit-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote API answered with an error or an unsuccessful status
    #[error("API error: {0}")]
    Api(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage accepted the request but returned no asset
    #[error("Image upload was rejected by storage")]
    UploadRejected,

    /// A single-flight operation is already running
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// The owning screen was unmounted while the operation was pending
    #[error("Operation cancelled")]
    Cancelled,
}
