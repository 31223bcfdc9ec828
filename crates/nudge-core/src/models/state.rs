use serde::{Deserialize, Serialize};

use super::{Scenario, WeightTable};

/// Everything the orchestrator carries across restarts.
///
/// Persisted as one unit so the weight table and the counters always come
/// from the same revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeState {
    /// Monotonic mutation counter. Bumped on every change that is persisted.
    pub revision: u64,
    pub iteration_count: u64,
    /// Number of feedback events that adjusted the weight table.
    pub feedback_count: u64,
    /// Sum of every completed cycle's above-threshold projection.
    pub total_projected_donations: u64,
    /// Above-threshold projection of the most recent cycle.
    pub last_projected_donations: u64,
    pub weights: WeightTable,
    pub scenario: Scenario,
}

impl CumulativeState {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            revision: 0,
            iteration_count: 0,
            feedback_count: 0,
            total_projected_donations: 0,
            last_projected_donations: 0,
            weights: WeightTable::new(),
            scenario,
        }
    }
}

impl Default for CumulativeState {
    fn default() -> Self {
        Self::new(Scenario::default())
    }
}
