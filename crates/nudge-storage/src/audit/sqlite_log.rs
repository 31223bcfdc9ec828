//! SQLite-backed audit log.

use std::path::Path;

use nudge_core::errors::NudgeResult;
use nudge_core::models::{AuditEvent, EventType};
use nudge_core::traits::AuditLog;

use super::queries;
use crate::migrations;
use crate::pool::ConnectionPool;

/// Durable audit log. Appends go through the single write connection, reads
/// through the pool (or the writer for in-memory databases).
pub struct SqliteAuditLog {
    pool: ConnectionPool,
}

impl SqliteAuditLog {
    /// Open (or create) the audit database at `path`. Existing records are
    /// kept; only pending migrations run.
    pub fn open(path: &Path, read_pool_size: usize) -> NudgeResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size, migrations::run_migrations)?;
        tracing::debug!(path = %path.display(), "audit log opened");
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> NudgeResult<Self> {
        let pool = ConnectionPool::open_in_memory(migrations::run_migrations)?;
        Ok(Self { pool })
    }

    /// Path of the underlying database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.pool.db_path.as_deref()
    }

    fn with_reader<F, T>(&self, f: F) -> NudgeResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> NudgeResult<T>,
    {
        if self.pool.db_path.is_some() {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl AuditLog for SqliteAuditLog {
    fn append(&self, event: &AuditEvent) -> NudgeResult<()> {
        self.pool.writer.with_conn(|conn| queries::insert(conn, event))
    }

    fn read_all(&self) -> NudgeResult<Vec<AuditEvent>> {
        self.with_reader(queries::select_all)
    }

    fn recent(&self, limit: usize) -> NudgeResult<Vec<AuditEvent>> {
        self.with_reader(|conn| queries::select_recent(conn, limit))
    }

    fn count(&self) -> NudgeResult<usize> {
        self.with_reader(queries::count)
    }

    fn count_by_type(&self, event_type: &EventType) -> NudgeResult<usize> {
        self.with_reader(|conn| queries::count_by_type(conn, event_type))
    }
}
