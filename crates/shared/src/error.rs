//! Error types for Kwoon

use thiserror::Error;

/// Error thrown when a document has an extension we cannot parse
#[derive(Debug, Error)]
#[error("Unsupported document format '{extension}' for {path}. Supported formats: {}", supported.join(", "))]
pub struct UnsupportedFormatError {
    pub path: String,
    pub extension: String,
    pub supported: Vec<String>,
}

/// Error thrown when a configuration value is out of range
#[derive(Debug, Error)]
#[error("Invalid value for '{field}': {reason}")]
pub struct InvalidConfigError {
    pub field: String,
    pub reason: String,
}

/// General Kwoon error type
#[derive(Debug, Error)]
pub enum KwoonError {
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, KwoonError>;
