// Single source of truth for all default values.

use crate::models::{Anchor, RosterEntry};

// --- Scheduler ---
pub const DEFAULT_INTERVAL_MINUTES: u64 = 10;
pub const DEFAULT_FUNDING_GOAL: u64 = 100_000_000_000;
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;
pub const DEFAULT_RECENT_LIMIT: usize = 5;

// --- Storage ---
pub const DEFAULT_AUDIT_DB_FILENAME: &str = "convergence_log.db";
pub const DEFAULT_STATE_FILENAME: &str = "nudge_state.json";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Donor simulation ---
pub const DEFAULT_PROBABILITY_MIN: f64 = 0.6;
pub const DEFAULT_PROBABILITY_MAX: f64 = 0.98;
pub const DEFAULT_DONATION_FRACTION_MIN: f64 = 0.01;
pub const DEFAULT_DONATION_FRACTION_MAX: f64 = 0.1;
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 0.85;
pub const DEFAULT_ANCHOR_THRESHOLD: f64 = 0.85;
pub const DEFAULT_PROBABILITY_CAP: f64 = 0.99;

// --- Scenario ---
pub const DEFAULT_SCENARIO: &str = "Prevent Ecological Collapse";

// --- Server ---
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;

/// Default candidate roster.
pub fn default_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("Elon Musk", 230_000_000_000, &["technology", "space", "philanthropy"]),
        RosterEntry::new("Jeff Bezos", 180_000_000_000, &["space", "books", "innovation"]),
        RosterEntry::new("Warren Buffett", 120_000_000_000, &["finance", "philanthropy", "legacy"]),
        RosterEntry::new("Oprah Winfrey", 2_500_000_000, &["media", "education", "mental health"]),
        RosterEntry::new(
            "MacKenzie Scott",
            30_000_000_000,
            &["education", "gender equality", "philanthropy"],
        ),
    ]
}

/// Default anchors: first roster entry boosts by 0.03, third by 0.02.
pub fn default_anchors() -> Vec<Anchor> {
    vec![Anchor::new("Elon Musk", 0.03), Anchor::new("Warren Buffett", 0.02)]
}
