//! Top-level error aggregating subsystem errors via `From` conversions.

use super::error_code::{self, NudgeErrorCode};
use super::{ConfigError, InvariantViolation, StorageError};

pub type NudgeResult<T> = Result<T, NudgeError>;

#[derive(Debug, thiserror::Error)]
pub enum NudgeError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl NudgeError {
    /// Fatal errors stop the process; storage errors are reported to the
    /// caller and the scheduler keeps going.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Invariant(_))
    }
}

impl NudgeErrorCode for NudgeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Invariant(e) => e.error_code(),
            Self::SerializationError(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}
