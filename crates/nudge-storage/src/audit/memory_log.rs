//! Vec-backed audit log. Same contract as the SQLite log, no durability.

use std::sync::Mutex;

use nudge_core::errors::{NudgeError, NudgeResult, StorageError};
use nudge_core::models::AuditEvent;
use nudge_core::traits::AuditLog;

#[derive(Default)]
pub struct InMemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> NudgeResult<std::sync::MutexGuard<'_, Vec<AuditEvent>>> {
        self.events.lock().map_err(|_| {
            NudgeError::Storage(StorageError::LockPoisoned {
                resource: "in-memory audit log".to_string(),
            })
        })
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, event: &AuditEvent) -> NudgeResult<()> {
        self.lock()?.push(event.clone());
        Ok(())
    }

    fn read_all(&self) -> NudgeResult<Vec<AuditEvent>> {
        Ok(self.lock()?.clone())
    }

    fn count(&self) -> NudgeResult<usize> {
        Ok(self.lock()?.len())
    }
}
