/// Scheduler version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// No weight may ever drop below this.
pub const WEIGHT_FLOOR: f64 = 0.1;

/// Starting weight for every category.
pub const INITIAL_WEIGHT: f64 = 1.0;

/// Weight added to the mapped category by one feedback event.
pub const FEEDBACK_DELTA: f64 = 0.1;

/// Version stamped into the durable state file envelope.
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Audit sources used by the scheduler itself.
pub const SOURCE_ENGINE: &str = "NudgeEngine";
pub const SOURCE_SCHEDULER: &str = "NudgeScheduler";
pub const SOURCE_SYSTEM: &str = "System";
