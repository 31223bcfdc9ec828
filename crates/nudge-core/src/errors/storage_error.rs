//! Storage-layer errors for the audit log and the state file.

use super::error_code::{self, NudgeErrorCode};

/// Recoverable at the call site: surfaced to the caller of
/// `report_event` / `run_cycle`, never swallowed or silently retried.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("lock poisoned: {resource}")]
    LockPoisoned { resource: String },
}

impl NudgeErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
