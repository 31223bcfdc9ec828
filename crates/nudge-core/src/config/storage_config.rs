use serde::{Deserialize, Serialize};

use super::defaults;

/// Storage subsystem configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite audit database.
    pub audit_db_path: String,
    /// Path to the JSON state file.
    pub state_path: String,
    /// Number of read connections in the audit pool.
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audit_db_path: defaults::DEFAULT_AUDIT_DB_FILENAME.to_string(),
            state_path: defaults::DEFAULT_STATE_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
        }
    }
}
