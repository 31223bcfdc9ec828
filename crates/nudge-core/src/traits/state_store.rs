use crate::errors::NudgeResult;
use crate::models::CumulativeState;

/// Durable home of [`CumulativeState`].
///
/// `save` must replace the previous state atomically: a crash mid-write
/// leaves either the old state or the new one, never a mix.
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet. A store that exists
    /// but cannot be understood is a configuration error, not `None`.
    fn load(&self) -> NudgeResult<Option<CumulativeState>>;

    fn save(&self, state: &CumulativeState) -> NudgeResult<()>;
}
