use crate::errors::NudgeResult;
use crate::models::{AuditEvent, EventType};

/// Append-only, durable record of timestamped events.
///
/// `append` must be safe to call concurrently and must never interleave or
/// truncate a record. Reads may miss an append that is still in flight but
/// never observe a torn record.
pub trait AuditLog: Send + Sync {
    /// Append one event. Storage failures propagate; they are never swallowed.
    fn append(&self, event: &AuditEvent) -> NudgeResult<()>;

    /// Every event, oldest first.
    fn read_all(&self) -> NudgeResult<Vec<AuditEvent>>;

    /// The last `limit` events, oldest first.
    fn recent(&self, limit: usize) -> NudgeResult<Vec<AuditEvent>> {
        let mut all = self.read_all()?;
        let skip = all.len().saturating_sub(limit);
        Ok(all.split_off(skip))
    }

    fn count(&self) -> NudgeResult<usize> {
        Ok(self.read_all()?.len())
    }

    fn count_by_type(&self, event_type: &EventType) -> NudgeResult<usize> {
        Ok(self
            .read_all()?
            .iter()
            .filter(|e| &e.event_type == event_type)
            .count())
    }
}
