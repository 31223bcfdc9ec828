use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NudgeCategory;

/// A delivered nudge. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    pub timestamp: DateTime<Utc>,
    pub category: NudgeCategory,
    pub message: String,
}

impl Nudge {
    /// Build a nudge for `category` with its fixed template, stamped now.
    pub fn new(category: NudgeCategory) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            message: category.message().to_string(),
        }
    }
}
