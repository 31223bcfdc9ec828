//! v001: audit_log table. Four columns, insertion order is rowid order.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS audit_log (
    timestamp   TEXT NOT NULL,
    source      TEXT NOT NULL,
    event_type  TEXT NOT NULL,
    details     TEXT NOT NULL DEFAULT ''
);
";
