use std::sync::{Mutex, MutexGuard, PoisonError};

/// Every guarded value in this crate is left consistent between statements,
/// so a panic elsewhere does not make it unusable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
