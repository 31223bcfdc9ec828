//! Process-local state store.

use std::sync::Mutex;

use nudge_core::errors::{NudgeError, NudgeResult, StorageError};
use nudge_core::models::CumulativeState;
use nudge_core::traits::StateStore;

#[derive(Default)]
pub struct MemoryStateStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    state: Option<CumulativeState>,
    saves: usize,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-persisted state.
    pub fn with_state(state: CumulativeState) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                state: Some(state),
                saves: 0,
            }),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|g| g.saves).unwrap_or(0)
    }

    fn lock(&self) -> NudgeResult<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner.lock().map_err(|_| {
            NudgeError::Storage(StorageError::LockPoisoned {
                resource: "in-memory state store".to_string(),
            })
        })
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> NudgeResult<Option<CumulativeState>> {
        Ok(self.lock()?.state.clone())
    }

    fn save(&self, state: &CumulativeState) -> NudgeResult<()> {
        let mut inner = self.lock()?;
        inner.state = Some(state.clone());
        inner.saves += 1;
        Ok(())
    }
}
