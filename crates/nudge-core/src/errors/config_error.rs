//! Configuration errors. All of them are fatal at startup.

use super::error_code::{self, NudgeErrorCode};

/// Errors that can occur during configuration or durable-state loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("unknown scenario: {name}")]
    UnknownScenario { name: String },

    #[error("incompatible state file {path}: {message}")]
    IncompatibleState { path: String, message: String },

    #[error("state file {path} failed checksum verification")]
    ChecksumMismatch { path: String },
}

impl NudgeErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
