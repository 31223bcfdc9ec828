//! # nudge-engine
//!
//! Selection, simulation, and orchestration:
//! - `WeightedSelector`: weighted-random category draws over a mutable table.
//! - `DonorReinforcementModel`: roster simulation with anchor reinforcement.
//! - `NudgeOrchestrator`: one cycle = simulate, draw, log, persist; plus the
//!   external feedback path.
//! - `CycleRunner`: periodic loop with goal and shutdown exits.

pub mod donor_model;
pub mod metrics;
pub mod orchestrator;
pub mod runner;
pub mod selector;

mod sync;

pub use donor_model::DonorReinforcementModel;
pub use metrics::UniformMetricsSource;
pub use orchestrator::{feedback_policy, CycleReport, FeedbackOutcome, NudgeOrchestrator};
pub use runner::{CycleRunner, RunOutcome};
pub use selector::WeightedSelector;
