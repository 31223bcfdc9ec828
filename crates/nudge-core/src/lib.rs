//! # nudge-core
//!
//! Foundation crate for the adaptive nudge scheduler.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing_setup;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancellation::CancellationToken;
pub use config::NudgeConfig;
pub use errors::{NudgeError, NudgeResult};
pub use models::{
    AuditEvent, CumulativeState, DonorProfile, EventType, MetricsSample, Nudge, NudgeCategory,
    Scenario, WeightTable,
};
