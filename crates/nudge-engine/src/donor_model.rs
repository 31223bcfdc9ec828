//! Donor reinforcement simulation.
//!
//! Each cycle regenerates every profile from the roster, then runs one
//! reinforcement pass: an anchor whose own sampled probability clears the
//! anchor threshold lifts every other profile's probability and inflates its
//! predicted donation.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nudge_core::config::DonorConfig;
use nudge_core::models::{DonorProfile, RosterEntry, SimulationOutcome};

const TRIGGERS: [&str; 4] = [
    "legacy",
    "altruism",
    "spiritual alignment",
    "AI inspiration",
];

const MEDIA: [&str; 4] = [
    "viral content",
    "dream",
    "AI recommendation",
    "foundation initiative",
];

const INFLUENCE_WINDOW_DAYS: i64 = 365;

pub struct DonorReinforcementModel {
    config: DonorConfig,
    rng: StdRng,
}

impl DonorReinforcementModel {
    pub fn new(config: DonorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Sample, reinforce, and total one roster.
    pub fn simulate(&mut self, roster: &[RosterEntry]) -> SimulationOutcome {
        let sampled = self.sample(roster);
        let profiles = self.reinforce(sampled);
        let threshold = self.config.success_threshold;
        let total_above_threshold = profiles
            .iter()
            .filter(|p| p.probability_of_success > threshold)
            .fold(0u64, |acc, p| acc.saturating_add(p.predicted_donation));

        tracing::debug!(
            donors = profiles.len(),
            total_above_threshold,
            "donor simulation complete"
        );
        SimulationOutcome {
            profiles,
            success_threshold: threshold,
            total_above_threshold,
        }
    }

    /// Simulate the configured roster.
    pub fn simulate_configured(&mut self) -> SimulationOutcome {
        let roster = self.config.roster.clone();
        self.simulate(&roster)
    }

    /// Independent per-entry sampling, before any reinforcement.
    pub fn sample(&mut self, roster: &[RosterEntry]) -> Vec<DonorProfile> {
        let now = Utc::now();
        let c = &self.config;
        let rng = &mut self.rng;
        roster
            .iter()
            .map(|entry| {
                let trigger = TRIGGERS[rng.gen_range(0..TRIGGERS.len())];
                let medium = MEDIA[rng.gen_range(0..MEDIA.len())];
                let probability = round2(rng.gen_range(c.probability_min..=c.probability_max));
                let fraction = rng.gen_range(c.donation_fraction_min..=c.donation_fraction_max);
                let days = rng.gen_range(1..=INFLUENCE_WINDOW_DAYS);
                DonorProfile {
                    name: entry.name.clone(),
                    net_worth: entry.net_worth,
                    trigger: trigger.to_string(),
                    medium: medium.to_string(),
                    influence_date: now + Duration::days(days),
                    predicted_donation: round_million(entry.net_worth as f64 * fraction),
                    probability_of_success: probability,
                }
            })
            .collect()
    }

    /// Apply every triggered anchor to every other profile.
    ///
    /// Triggers are decided on the sampled probabilities, so the order of
    /// anchors never changes which ones fire. Boosts from several anchors
    /// add up and are applied once. Never lowers a probability.
    pub fn reinforce(&self, mut profiles: Vec<DonorProfile>) -> Vec<DonorProfile> {
        let c = &self.config;
        let fired: Vec<(&str, f64)> = c
            .anchors
            .iter()
            .filter(|anchor| {
                profiles
                    .iter()
                    .find(|p| p.name == anchor.name)
                    .is_some_and(|p| p.probability_of_success > c.anchor_threshold)
            })
            .map(|anchor| (anchor.name.as_str(), anchor.boost))
            .collect();
        for (anchor, boost) in &fired {
            tracing::debug!(anchor, boost, "anchor reinforcement triggered");
        }

        for profile in &mut profiles {
            let boost: f64 = fired
                .iter()
                .filter(|(anchor, _)| profile.name != *anchor)
                .map(|(_, boost)| boost)
                .sum();
            if boost == 0.0 {
                continue;
            }
            let before = profile.probability_of_success;
            profile.probability_of_success =
                round2((before + boost).min(c.probability_cap)).max(before);
            profile.predicted_donation =
                round_million(profile.predicted_donation as f64 * (1.0 + 2.0 * boost));
        }
        profiles
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round_million(x: f64) -> u64 {
    ((x / 1_000_000.0).round() * 1_000_000.0) as u64
}
