//! Raw SQL for the audit_log table.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};

use nudge_core::errors::NudgeResult;
use nudge_core::models::{AuditEvent, EventType};

use crate::to_storage_err;

const SELECT_COLUMNS: &str = "SELECT timestamp, source, event_type, details FROM audit_log";

const SELECT_RECENT: &str = "
    SELECT timestamp, source, event_type, details FROM (
        SELECT rowid AS rid, timestamp, source, event_type, details
        FROM audit_log ORDER BY rowid DESC LIMIT ?1
    ) ORDER BY rid ASC";

/// Timestamps are stored as RFC 3339 with as many fractional digits as the
/// value carries, so they read back exactly.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn insert(conn: &Connection, event: &AuditEvent) -> NudgeResult<()> {
    conn.execute(
        "INSERT INTO audit_log (timestamp, source, event_type, details) VALUES (?1, ?2, ?3, ?4)",
        params![
            format_timestamp(&event.timestamp),
            event.source,
            event.event_type.as_str(),
            event.details,
        ],
    )
    .map_err(|e| to_storage_err(format!("audit append failed: {e}")))?;
    Ok(())
}

pub(crate) fn select_all(conn: &Connection) -> NudgeResult<Vec<AuditEvent>> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY rowid ASC");
    collect(conn, &sql, [])
}

/// The newest `limit` rows, returned oldest first.
pub(crate) fn select_recent(conn: &Connection, limit: usize) -> NudgeResult<Vec<AuditEvent>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    collect(conn, SELECT_RECENT, params![limit])
}

pub(crate) fn count(conn: &Connection) -> NudgeResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n.max(0) as usize)
}

pub(crate) fn count_by_type(conn: &Connection, event_type: &EventType) -> NudgeResult<usize> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM audit_log WHERE event_type = ?1",
            params![event_type.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n.max(0) as usize)
}

fn collect<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> NudgeResult<Vec<AuditEvent>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, read_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut events = Vec::new();
    for row in rows {
        let (timestamp, source, event_type, details) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| to_storage_err(format!("invalid audit timestamp '{timestamp}': {e}")))?
            .with_timezone(&Utc);
        events.push(AuditEvent {
            timestamp,
            source,
            event_type: EventType::from(event_type),
            details,
        });
    }
    Ok(events)
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}
