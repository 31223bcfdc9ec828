use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::NudgeCategory;
use crate::constants::{INITIAL_WEIGHT, WEIGHT_FLOOR};
use crate::errors::InvariantViolation;

/// Category → weight mapping used by every draw.
///
/// Invariant: every category is present and every weight is finite and
/// `>= WEIGHT_FLOOR`. Weights are adjusted, never removed. The only ways to
/// build one are [`WeightTable::new`] and the validating [`TryFrom`], so an
/// invalid table cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<NudgeCategory, f64>",
    into = "BTreeMap<NudgeCategory, f64>"
)]
pub struct WeightTable {
    weights: BTreeMap<NudgeCategory, f64>,
}

impl WeightTable {
    /// Every category at the initial weight.
    pub fn new() -> Self {
        Self {
            weights: NudgeCategory::ALL
                .into_iter()
                .map(|c| (c, INITIAL_WEIGHT))
                .collect(),
        }
    }

    pub fn get(&self, category: NudgeCategory) -> f64 {
        self.weights.get(&category).copied().unwrap_or(WEIGHT_FLOOR)
    }

    /// Sum of all weights. Always `>= WEIGHT_FLOOR * 4`.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Weights in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (NudgeCategory, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (*c, *w))
    }

    /// Probability mass of a category under the current weights.
    pub fn proportion(&self, category: NudgeCategory) -> f64 {
        self.get(category) / self.total()
    }

    /// Add `delta` to a category's weight, then clamp to the floor.
    /// A non-finite delta, or one that would overflow the weight or the
    /// table total, leaves the table untouched. Returns the new weight.
    pub fn apply_delta(&mut self, category: NudgeCategory, delta: f64) -> f64 {
        let current = self.weights.get(&category).copied().unwrap_or(INITIAL_WEIGHT);
        if !delta.is_finite() {
            return current;
        }
        let next = (current + delta).max(WEIGHT_FLOOR);
        let others: f64 = self
            .weights
            .iter()
            .filter(|(c, _)| **c != category)
            .map(|(_, w)| *w)
            .sum();
        if !next.is_finite() || !(others + next).is_finite() {
            return current;
        }
        self.weights.insert(category, next);
        next
    }

    /// Verify the floor and completeness invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.weights.is_empty() {
            return Err(InvariantViolation::EmptyWeightTable);
        }
        for category in NudgeCategory::ALL {
            match self.weights.get(&category) {
                None => {
                    return Err(InvariantViolation::MissingCategory {
                        category: category.to_string(),
                    })
                }
                Some(w) if !w.is_finite() || *w < WEIGHT_FLOOR => {
                    return Err(InvariantViolation::WeightBelowFloor {
                        category: category.to_string(),
                        weight: *w,
                        floor: WEIGHT_FLOOR,
                    })
                }
                Some(_) => {}
            }
        }
        let total = self.total();
        if !total.is_finite() {
            return Err(InvariantViolation::NonFiniteTotal { total });
        }
        Ok(())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<BTreeMap<NudgeCategory, f64>> for WeightTable {
    type Error = InvariantViolation;

    fn try_from(weights: BTreeMap<NudgeCategory, f64>) -> Result<Self, Self::Error> {
        let table = Self { weights };
        table.check_invariants()?;
        Ok(table)
    }
}

impl From<WeightTable> for BTreeMap<NudgeCategory, f64> {
    fn from(table: WeightTable) -> Self {
        table.weights
    }
}
