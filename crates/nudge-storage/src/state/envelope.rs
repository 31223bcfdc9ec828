//! On-disk framing for the state file: schema version plus a blake3
//! checksum over the canonical JSON of the state body.

use serde::{Deserialize, Serialize};

use nudge_core::constants::STATE_SCHEMA_VERSION;
use nudge_core::errors::{ConfigError, NudgeResult};
use nudge_core::models::CumulativeState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub schema_version: u32,
    pub checksum: String,
    pub state: serde_json::Value,
}

impl StateEnvelope {
    /// Wrap a state. The body goes through `serde_json::Value` so the
    /// checksum is computed over the same key order the loader sees.
    pub fn seal(state: &CumulativeState) -> NudgeResult<Self> {
        let state = serde_json::to_value(state)?;
        let checksum = checksum_of(&state)?;
        Ok(Self {
            schema_version: STATE_SCHEMA_VERSION,
            checksum,
            state,
        })
    }

    /// Verify version and checksum, then decode the body. Every failure is
    /// a configuration error naming `path`.
    pub fn open(self, path: &str) -> Result<CumulativeState, ConfigError> {
        if self.schema_version != STATE_SCHEMA_VERSION {
            return Err(ConfigError::IncompatibleState {
                path: path.to_string(),
                message: format!(
                    "schema version {} is not supported (expected {STATE_SCHEMA_VERSION})",
                    self.schema_version
                ),
            });
        }
        let actual = checksum_of(&self.state).map_err(|e| ConfigError::IncompatibleState {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        if actual != self.checksum {
            return Err(ConfigError::ChecksumMismatch {
                path: path.to_string(),
            });
        }
        let state: CumulativeState =
            serde_json::from_value(self.state).map_err(|e| ConfigError::IncompatibleState {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        // Deserialization already validates the weight table; re-check so a
        // future field added without validation still can't slip through.
        state
            .weights
            .check_invariants()
            .map_err(|e| ConfigError::IncompatibleState {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Ok(state)
    }
}

fn checksum_of(value: &serde_json::Value) -> NudgeResult<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
