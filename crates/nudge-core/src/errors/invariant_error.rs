//! Invariant violations. These indicate a logic defect, never a runtime
//! condition to recover from.

use super::error_code::{self, NudgeErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum InvariantViolation {
    #[error("weight for {category} is {weight}, below floor {floor}")]
    WeightBelowFloor {
        category: String,
        weight: f64,
        floor: f64,
    },

    #[error("weight table is missing category {category}")]
    MissingCategory { category: String },

    #[error("weight table is empty")]
    EmptyWeightTable,

    #[error("weight table total {total} is not finite")]
    NonFiniteTotal { total: f64 },
}

impl NudgeErrorCode for InvariantViolation {
    fn error_code(&self) -> &'static str {
        error_code::INVARIANT_VIOLATION
    }
}
