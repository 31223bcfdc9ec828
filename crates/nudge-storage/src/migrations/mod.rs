//! Schema migrations using PRAGMA user_version.

pub mod v001_audit_log;
pub mod v002_audit_indexes;

use rusqlite::Connection;

use nudge_core::errors::{NudgeError, NudgeResult, StorageError};

/// Highest schema version this build knows how to open.
pub const LATEST_VERSION: u32 = 2;

/// Run all pending migrations. Re-running against an up-to-date database
/// is a no-op, so opening an existing log never clobbers it.
pub fn run_migrations(conn: &Connection) -> NudgeResult<()> {
    let current = current_version(conn)?;
    if current > LATEST_VERSION {
        return Err(StorageError::MigrationFailed {
            version: current,
            message: format!("database schema is newer than supported version {LATEST_VERSION}"),
        }
        .into());
    }

    let migrations: &[(&str, u32)] = &[
        (v001_audit_log::MIGRATION_SQL, 1),
        (v002_audit_indexes::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            tracing::info!(version = version, "applied audit log migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> NudgeResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| {
            NudgeError::Storage(StorageError::SqliteError {
                message: e.to_string(),
            })
        })
}
