//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 500ms, 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown directory name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid directory: \"{input}\". Valid directories are: DOCUMENTS, DATA, LIBRARY, CACHE, EXTERNAL, EXTERNAL_STORAGE, EXTERNAL_CACHE, LIBRARY_NO_CLOUD, TEMPORARY")]
pub struct DirectoryParseError {
    pub input: String,
}

/// Error when an unknown output format is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid audio format: \"{input}\". Valid formats are: flac, wav")]
pub struct AudioFormatParseError {
    pub input: String,
}

/// Error when an unknown recording status string is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid recording status: \"{input}\". Expected RECORDING, PAUSED or NONE")]
pub struct StatusParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
