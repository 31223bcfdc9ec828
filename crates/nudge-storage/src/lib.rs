//! # nudge-storage
//!
//! Durable storage for the nudge scheduler:
//! - SQLite audit log: single write connection + read pool, WAL, `user_version` migrations.
//! - JSON state file with checksummed envelope and atomic replace.
//! - In-memory variants of both for tests and embedding.

pub mod audit;
pub mod migrations;
pub mod pool;
pub mod state;

pub use audit::{render_csv, InMemoryAuditLog, SqliteAuditLog};
pub use state::{JsonStateStore, MemoryStateStore, StateEnvelope};

use nudge_core::errors::{NudgeError, StorageError};

/// Helper to convert a string error into a NudgeError::Storage.
pub(crate) fn to_storage_err(msg: String) -> NudgeError {
    NudgeError::Storage(StorageError::SqliteError { message: msg })
}

/// Helper to convert an I/O failure on `path` into a NudgeError::Storage.
pub(crate) fn to_io_err(path: &std::path::Path, err: std::io::Error) -> NudgeError {
    NudgeError::Storage(StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
