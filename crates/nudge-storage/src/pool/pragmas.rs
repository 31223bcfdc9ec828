//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, FULL sync on the writer so an acknowledged append survives a
//! crash, 5s busy_timeout.

use rusqlite::Connection;

use nudge_core::errors::NudgeResult;

use crate::to_storage_err;

/// Apply durability pragmas to the write connection.
pub fn apply_pragmas(conn: &Connection) -> NudgeResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = FULL;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| to_storage_err(format!("failed to apply pragmas: {e}")))?;
    Ok(())
}

/// Apply read-only pragmas to a read connection.
pub fn apply_read_pragmas(conn: &Connection) -> NudgeResult<()> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| to_storage_err(format!("failed to apply read pragmas: {e}")))
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> NudgeResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
