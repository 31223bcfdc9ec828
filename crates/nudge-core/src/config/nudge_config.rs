//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    DonorConfig, ObservabilityConfig, ScenarioConfig, SchedulerConfig, ServerConfig,
    StorageConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`NUDGE_*`)
/// 3. Config file (`nudge.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NudgeConfig {
    pub scheduler: SchedulerConfig,
    pub storage: StorageConfig,
    pub donors: DonorConfig,
    pub scenario: ScenarioConfig,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub interval_minutes: Option<u64>,
    pub funding_goal: Option<u64>,
    pub seed: Option<u64>,
    pub max_cycles: Option<u64>,
    pub audit_db_path: Option<String>,
    pub state_path: Option<String>,
    pub scenario: Option<String>,
    pub port: Option<u16>,
}

impl NudgeConfig {
    /// Load configuration with layered resolution.
    ///
    /// A missing config file is not an error: defaults apply. A file that
    /// exists but does not parse is.
    pub fn load(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());

        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file. Unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `NUDGE_*` overrides. `lookup` abstracts the environment so
    /// tests don't have to mutate process state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NUDGE_INTERVAL_MINUTES").and_then(|v| v.parse().ok()) {
            self.scheduler.interval_minutes = v;
        }
        if let Some(v) = lookup("NUDGE_FUNDING_GOAL").and_then(|v| v.parse().ok()) {
            self.scheduler.funding_goal = v;
        }
        if let Some(v) = lookup("NUDGE_SEED").and_then(|v| v.parse().ok()) {
            self.scheduler.seed = Some(v);
        }
        if let Some(v) = lookup("NUDGE_AUDIT_DB_PATH") {
            self.storage.audit_db_path = v;
        }
        if let Some(v) = lookup("NUDGE_STATE_PATH") {
            self.storage.state_path = v;
        }
        if let Some(v) = lookup("NUDGE_SCENARIO") {
            self.scenario.name = v;
        }
        if let Some(v) = lookup("NUDGE_SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = v;
        }
        if let Some(v) = lookup("NUDGE_LOG_JSON").and_then(|v| v.parse().ok()) {
            self.observability.json_logs = v;
        }
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(v) = cli.interval_minutes {
            self.scheduler.interval_minutes = v;
        }
        if let Some(v) = cli.funding_goal {
            self.scheduler.funding_goal = v;
        }
        if let Some(v) = cli.seed {
            self.scheduler.seed = Some(v);
        }
        if let Some(v) = cli.max_cycles {
            self.scheduler.max_cycles = Some(v);
        }
        if let Some(ref v) = cli.audit_db_path {
            self.storage.audit_db_path = v.clone();
        }
        if let Some(ref v) = cli.state_path {
            self.storage.state_path = v.clone();
        }
        if let Some(ref v) = cli.scenario {
            self.scenario.name = v.clone();
        }
        if let Some(v) = cli.port {
            self.server.port = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.interval_minutes == 0 {
            return Err(invalid("scheduler.interval_minutes", "must be greater than 0"));
        }
        if self.scheduler.history_capacity == 0 {
            return Err(invalid("scheduler.history_capacity", "must be greater than 0"));
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be greater than 0"));
        }

        let d = &self.donors;
        if d.roster.is_empty() {
            return Err(invalid("donors.roster", "must contain at least one entry"));
        }
        check_range("donors.probability", d.probability_min, d.probability_max)?;
        check_range(
            "donors.donation_fraction",
            d.donation_fraction_min,
            d.donation_fraction_max,
        )?;
        for (field, value) in [
            ("donors.success_threshold", d.success_threshold),
            ("donors.anchor_threshold", d.anchor_threshold),
            ("donors.probability_cap", d.probability_cap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        if d.probability_cap < d.probability_max {
            return Err(invalid(
                "donors.probability_cap",
                "must not be below donors.probability_max",
            ));
        }
        for anchor in &d.anchors {
            if !anchor.boost.is_finite() || anchor.boost <= 0.0 {
                return Err(invalid("donors.anchors", "boost must be a positive number"));
            }
            if !d.roster.iter().any(|r| r.name == anchor.name) {
                return Err(ConfigError::ValidationFailed {
                    field: "donors.anchors".to_string(),
                    message: format!("anchor '{}' is not on the roster", anchor.name),
                });
            }
        }

        self.scenario.scenario()?;
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_range(field: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) {
        return Err(invalid(field, "bounds must be between 0.0 and 1.0"));
    }
    if min > max {
        return Err(invalid(field, "min must not exceed max"));
    }
    Ok(())
}
