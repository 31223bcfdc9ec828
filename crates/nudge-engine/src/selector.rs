//! Weighted-random category selection over a mutable [`WeightTable`].

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nudge_core::models::{NudgeCategory, WeightTable};

use crate::sync::lock;

/// Draws categories in proportion to their weight and accepts feedback
/// deltas. Draws and deltas share one lock, so a draw never sees a
/// half-applied update.
pub struct WeightedSelector {
    inner: Mutex<SelectorInner>,
}

struct SelectorInner {
    table: WeightTable,
    rng: StdRng,
}

impl WeightedSelector {
    /// Selector seeded from OS entropy.
    pub fn new(table: WeightTable) -> Self {
        Self::with_rng(table, StdRng::from_entropy())
    }

    /// Reproducible selector: same seed, same table, same draws.
    pub fn seeded(table: WeightTable, seed: u64) -> Self {
        Self::with_rng(table, StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(table: WeightTable, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(table, seed),
            None => Self::new(table),
        }
    }

    fn with_rng(table: WeightTable, rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(SelectorInner { table, rng }),
        }
    }

    /// Pick a category with probability `weight / total`.
    pub fn draw(&self) -> NudgeCategory {
        let mut inner = lock(&self.inner);
        let total = inner.table.total();
        let r = inner.rng.gen_range(0.0..total);
        let category = select(&inner.table, r);
        tracing::debug!(%category, r, total, "category drawn");
        category
    }

    /// Add `delta` to a category's weight, clamped to the floor.
    /// Returns the resulting weight.
    pub fn apply_delta(&self, category: NudgeCategory, delta: f64) -> f64 {
        if !delta.is_finite() {
            tracing::warn!(%category, delta, "ignoring non-finite weight delta");
        }
        lock(&self.inner).table.apply_delta(category, delta)
    }

    /// Delta addressed by free-text category name. Unknown names are
    /// ignored with a warning and return `None`.
    pub fn apply_named_delta(&self, name: &str, delta: f64) -> Option<f64> {
        match NudgeCategory::from_name(name) {
            Some(category) => Some(self.apply_delta(category, delta)),
            None => {
                tracing::warn!(category = name, delta, "ignoring feedback for unknown category");
                None
            }
        }
    }

    /// Apply a `{category: delta}` feedback map. Returns how many entries
    /// named a known category.
    pub fn apply_feedback<'a, I>(&self, feedback: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        feedback
            .into_iter()
            .filter_map(|(name, delta)| self.apply_named_delta(name, delta))
            .count()
    }

    /// Copy of the current weights.
    pub fn snapshot(&self) -> WeightTable {
        lock(&self.inner).table.clone()
    }

    /// Replace the weights wholesale (state restore).
    pub fn restore(&self, table: WeightTable) {
        lock(&self.inner).table = table;
    }
}

/// Walk categories in fixed order accumulating weight; the first whose
/// cumulative weight reaches `r` wins. Falls back to the last category when
/// rounding leaves `r` just past the final sum.
pub(crate) fn select(table: &WeightTable, r: f64) -> NudgeCategory {
    let mut cumulative = 0.0;
    let mut last = NudgeCategory::Visionary;
    for (category, weight) in table.iter() {
        cumulative += weight;
        if cumulative >= r {
            return category;
        }
        last = category;
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_respects_cumulative_boundaries() {
        // Uniform 1.0 weights: emotional [0,1], technical (1,2], ...
        let table = WeightTable::new();
        assert_eq!(select(&table, 0.0), NudgeCategory::Emotional);
        assert_eq!(select(&table, 1.0), NudgeCategory::Emotional);
        assert_eq!(select(&table, 1.0001), NudgeCategory::Technical);
        assert_eq!(select(&table, 2.5), NudgeCategory::Spiritual);
        assert_eq!(select(&table, 3.9999), NudgeCategory::Visionary);
    }

    #[test]
    fn select_past_total_falls_back_to_last() {
        let table = WeightTable::new();
        assert_eq!(select(&table, 4.5), NudgeCategory::Visionary);
    }

    #[test]
    fn same_seed_same_draws() {
        let a = WeightedSelector::seeded(WeightTable::new(), 42);
        let b = WeightedSelector::seeded(WeightTable::new(), 42);
        let da: Vec<_> = (0..64).map(|_| a.draw()).collect();
        let db: Vec<_> = (0..64).map(|_| b.draw()).collect();
        assert_eq!(da, db);
    }

    #[test]
    fn named_delta_ignores_unknown_names() {
        let selector = WeightedSelector::seeded(WeightTable::new(), 1);
        assert_eq!(selector.apply_named_delta("financial", 5.0), None);
        assert_eq!(selector.snapshot(), WeightTable::new());
        let w = selector.apply_named_delta("Spiritual", 0.5).unwrap();
        assert!((w - 1.5).abs() < 1e-12);
    }

    #[test]
    fn feedback_map_counts_known_entries() {
        let selector = WeightedSelector::seeded(WeightTable::new(), 1);
        let applied = selector.apply_feedback([("emotional", 0.2), ("nope", 1.0), ("technical", -5.0)]);
        assert_eq!(applied, 2);
        let table = selector.snapshot();
        assert!((table.get(NudgeCategory::Emotional) - 1.2).abs() < 1e-12);
        assert_eq!(table.get(NudgeCategory::Technical), 0.1);
    }
}
