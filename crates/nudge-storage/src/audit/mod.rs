//! Audit log backends and export.

mod export;
mod memory_log;
mod queries;
mod sqlite_log;

pub use export::{render_csv, CSV_HEADER};
pub use memory_log::InMemoryAuditLog;
pub use sqlite_log::SqliteAuditLog;
