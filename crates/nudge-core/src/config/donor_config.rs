use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::{Anchor, RosterEntry};

/// Donor reinforcement simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonorConfig {
    pub roster: Vec<RosterEntry>,
    pub anchors: Vec<Anchor>,
    pub probability_min: f64,
    pub probability_max: f64,
    pub donation_fraction_min: f64,
    pub donation_fraction_max: f64,
    /// Profiles above this count toward the projected total.
    pub success_threshold: f64,
    /// An anchor boosts others only when its own probability exceeds this.
    pub anchor_threshold: f64,
    /// Upper bound on a boosted probability.
    pub probability_cap: f64,
}

impl Default for DonorConfig {
    fn default() -> Self {
        Self {
            roster: defaults::default_roster(),
            anchors: defaults::default_anchors(),
            probability_min: defaults::DEFAULT_PROBABILITY_MIN,
            probability_max: defaults::DEFAULT_PROBABILITY_MAX,
            donation_fraction_min: defaults::DEFAULT_DONATION_FRACTION_MIN,
            donation_fraction_max: defaults::DEFAULT_DONATION_FRACTION_MAX,
            success_threshold: defaults::DEFAULT_SUCCESS_THRESHOLD,
            anchor_threshold: defaults::DEFAULT_ANCHOR_THRESHOLD,
            probability_cap: defaults::DEFAULT_PROBABILITY_CAP,
        }
    }
}
