//! v002: lookup index for per-type counts.

pub const MIGRATION_SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_audit_event_type ON audit_log(event_type);
";
