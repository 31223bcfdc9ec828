use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of nudge categories.
///
/// Declaration order is the iteration order used by weighted draws and by
/// the serialized weight table. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeCategory {
    Emotional,
    Technical,
    Spiritual,
    Visionary,
}

impl NudgeCategory {
    /// All categories in draw order.
    pub const ALL: [NudgeCategory; 4] = [
        NudgeCategory::Emotional,
        NudgeCategory::Technical,
        NudgeCategory::Spiritual,
        NudgeCategory::Visionary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emotional => "emotional",
            Self::Technical => "technical",
            Self::Spiritual => "spiritual",
            Self::Visionary => "visionary",
        }
    }

    /// Parse a free-text category name. Case-insensitive, surrounding
    /// whitespace ignored. Returns `None` for anything outside the set.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    /// Fixed message template delivered with every nudge of this category.
    pub fn message(self) -> &'static str {
        match self {
            Self::Emotional => {
                "Imagine if your next act of kindness wasn't chance, but destiny shaped by quantum alignment."
            }
            Self::Technical => {
                "We're testing probabilistic quantum reinforcement across multiversal decision trees. Want to see it in action?"
            }
            Self::Spiritual => {
                "If thoughts are echoes across realities, what does intention mean in a quantum multiverse?"
            }
            Self::Visionary => {
                "Support a project shaping ethical influence, not by control, but by cognitive resonance."
            }
        }
    }
}

impl fmt::Display for NudgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
