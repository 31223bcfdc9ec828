//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use nudge_core::config::CliOverrides;

#[derive(Debug, Parser)]
#[command(name = "nudge-server")]
#[command(about = "Adaptive nudge scheduler: webhook listener, cycle loop, and audit tools")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "nudge.toml", env = "NUDGE_CONFIG")]
    pub config: PathBuf,

    /// Minutes between cycles
    #[arg(long, global = true)]
    pub interval_minutes: Option<u64>,

    /// Projected total that ends the cycle loop
    #[arg(long, global = true)]
    pub funding_goal: Option<u64>,

    /// Seed for every random source
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Stop the loop after this many cycles
    #[arg(long, global = true)]
    pub max_cycles: Option<u64>,

    /// SQLite audit database path
    #[arg(long, global = true)]
    pub audit_db: Option<String>,

    /// JSON state file path
    #[arg(long, global = true)]
    pub state_path: Option<String>,

    /// Scenario display name, e.g. "Stabilize Global Markets"
    #[arg(long, global = true)]
    pub scenario: Option<String>,

    /// Webhook listener port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the webhook listener and the cycle loop until shutdown
    Serve {
        /// Only listen for webhooks; do not run cycles
        #[arg(long)]
        no_loop: bool,
    },
    /// Run cycles immediately and print their reports
    Cycle {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
    },
    /// Report an external event
    Report {
        #[arg(long)]
        source: String,
        #[arg(long = "type")]
        event_type: String,
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Show recently deployed nudges from the audit log
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Dump the audit log
    Audit {
        /// Only the last N events
        #[arg(short, long)]
        limit: Option<usize>,
        /// Per-type counts instead of rows
        #[arg(long)]
        summary: bool,
    },
    /// Print the persisted scheduler state
    State,
    /// Switch the current scenario and persist it
    SetScenario { name: String },
    /// Print the resolved configuration as TOML
    Config,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            interval_minutes: self.interval_minutes,
            funding_goal: self.funding_goal,
            seed: self.seed,
            max_cycles: self.max_cycles,
            audit_db_path: self.audit_db.clone(),
            state_path: self.state_path.clone(),
            scenario: self.scenario.clone(),
            port: self.port,
        }
    }
}
