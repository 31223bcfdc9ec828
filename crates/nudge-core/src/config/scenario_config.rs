use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;
use crate::models::Scenario;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Display name, e.g. "Stabilize Global Markets".
    pub name: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: defaults::DEFAULT_SCENARIO.to_string(),
        }
    }
}

impl ScenarioConfig {
    pub fn scenario(&self) -> Result<Scenario, ConfigError> {
        Scenario::from_name(&self.name)
    }
}
