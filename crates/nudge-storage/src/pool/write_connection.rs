//! Single write connection behind a mutex. Serialized writes, so
//! concurrent appenders never interleave a record.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use nudge_core::errors::{NudgeError, NudgeResult, StorageError};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection protected by a mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path) -> NudgeResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> NudgeResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> NudgeResult<T>
    where
        F: FnOnce(&Connection) -> NudgeResult<T>,
    {
        let guard = self.conn.lock().map_err(|_| {
            NudgeError::Storage(StorageError::LockPoisoned {
                resource: "audit write connection".to_string(),
            })
        })?;
        f(&guard)
    }
}
