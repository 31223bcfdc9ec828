//! Domain models shared across the workspace.

pub mod audit_event;
pub mod category;
pub mod donor;
pub mod metrics_sample;
pub mod nudge;
pub mod scenario;
pub mod state;
pub mod weight_table;

pub use audit_event::{AuditEvent, EventType};
pub use category::NudgeCategory;
pub use donor::{Anchor, DonorProfile, RosterEntry, SimulationOutcome};
pub use metrics_sample::MetricsSample;
pub use nudge::Nudge;
pub use scenario::{GoalStatus, Scenario, ScenarioReading, TuningStatus};
pub use state::CumulativeState;
pub use weight_table::WeightTable;
