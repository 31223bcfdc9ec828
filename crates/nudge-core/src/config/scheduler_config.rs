use serde::{Deserialize, Serialize};

use super::defaults;

/// Cycle loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Sleep between cycles.
    pub interval_minutes: u64,
    /// Loop exits with a GoalMet event once a cycle's projection reaches this.
    pub funding_goal: u64,
    /// Nudges retained in memory for `recent_nudges`.
    pub history_capacity: usize,
    /// Default `limit` for history queries.
    pub recent_limit: usize,
    /// Seed for every random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Stop after this many cycles. `None` runs until goal or shutdown.
    pub max_cycles: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: defaults::DEFAULT_INTERVAL_MINUTES,
            funding_goal: defaults::DEFAULT_FUNDING_GOAL,
            history_capacity: defaults::DEFAULT_HISTORY_CAPACITY,
            recent_limit: defaults::DEFAULT_RECENT_LIMIT,
            seed: None,
            max_cycles: None,
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_minutes * 60)
    }
}
