use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fixed candidate the simulation samples every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    /// Net worth in whole dollars.
    pub net_worth: u64,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, net_worth: u64, interests: &[&str]) -> Self {
        Self {
            name: name.into(),
            net_worth,
            interests: interests.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A high-influence roster member whose sampled probability, when above the
/// anchor threshold, boosts every other profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub boost: f64,
}

impl Anchor {
    pub fn new(name: impl Into<String>, boost: f64) -> Self {
        Self {
            name: name.into(),
            boost,
        }
    }
}

/// One simulated donor. Regenerated wholesale every cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub name: String,
    pub net_worth: u64,
    /// Cosmetic descriptor, no behavioral effect.
    pub trigger: String,
    /// Cosmetic descriptor, no behavioral effect.
    pub medium: String,
    pub influence_date: DateTime<Utc>,
    /// Rounded to the nearest million.
    pub predicted_donation: u64,
    pub probability_of_success: f64,
}

/// Output of one simulation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub profiles: Vec<DonorProfile>,
    /// Threshold used to compute `total_above_threshold`.
    pub success_threshold: f64,
    /// Sum of `predicted_donation` over profiles whose final probability
    /// exceeds `success_threshold`.
    pub total_above_threshold: u64,
}

impl SimulationOutcome {
    /// Profiles whose final probability exceeds `threshold`.
    pub fn high_probability(&self, threshold: f64) -> Vec<&DonorProfile> {
        self.profiles
            .iter()
            .filter(|p| p.probability_of_success > threshold)
            .collect()
    }

    pub fn profile(&self, name: &str) -> Option<&DonorProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}
