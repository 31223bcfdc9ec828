//! Error handling for the nudge scheduler.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod invariant_error;
pub mod nudge_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::NudgeErrorCode;
pub use invariant_error::InvariantViolation;
pub use nudge_error::{NudgeError, NudgeResult};
pub use storage_error::StorageError;
