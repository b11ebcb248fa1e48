//! Mutex helpers shared by the in-process and `SQLite` backends.

use std::sync::{Mutex, MutexGuard};

/// Acquires a mutex lock, recovering from poison.
///
/// Critical sections never leave the guarded state half-updated, so a
/// poisoned guard is recovered. The event is logged and counted.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("storage mutex was poisoned, recovering");
            metrics::counter!("todo_storage_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}
