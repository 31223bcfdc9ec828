//! Configuration system.
//! TOML-based, layered resolution: CLI > env > config file > defaults.

pub mod defaults;
pub mod donor_config;
pub mod nudge_config;
pub mod observability_config;
pub mod scenario_config;
pub mod scheduler_config;
pub mod server_config;
pub mod storage_config;

pub use donor_config::DonorConfig;
pub use nudge_config::{CliOverrides, NudgeConfig};
pub use observability_config::ObservabilityConfig;
pub use scenario_config::ScenarioConfig;
pub use scheduler_config::SchedulerConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;
