//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use nudge_core::errors::NudgeResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    ///
    /// `init` runs on the writer before any reader is opened, so read-only
    /// connections never race a missing schema.
    pub fn open<F>(path: &Path, read_pool_size: usize, init: F) -> NudgeResult<Self>
    where
        F: FnOnce(&rusqlite::Connection) -> NudgeResult<()>,
    {
        let writer = WriteConnection::open(path)?;
        writer.with_conn(init)?;
        let readers = ReadPool::open(path, read_pool_size)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory connection pool (for testing).
    /// In-memory readers are isolated databases, so callers must route
    /// reads through the writer.
    pub fn open_in_memory<F>(init: F) -> NudgeResult<Self>
    where
        F: FnOnce(&rusqlite::Connection) -> NudgeResult<()>,
    {
        let writer = WriteConnection::open_in_memory()?;
        writer.with_conn(init)?;
        let readers = ReadPool::open_in_memory(1)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
