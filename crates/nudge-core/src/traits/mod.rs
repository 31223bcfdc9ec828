//! Seams between the orchestrator and its collaborators.

pub mod audit_log;
pub mod metrics_source;
pub mod state_store;

pub use audit_log::AuditLog;
pub use metrics_source::MetricsSource;
pub use state_store::StateStore;
