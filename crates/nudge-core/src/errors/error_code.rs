//! NudgeErrorCode trait for structured error reporting at the HTTP/CLI boundary.

/// Every error enum implements this to provide a stable code string
/// that callers can match on without parsing messages.
pub trait NudgeErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
