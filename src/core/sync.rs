//! Synchronization utilities for robust mutex handling
//!
//! Registry and reference-host state is plain bookkeeping (vectors and
//! counters) that stays consistent even when a panic interrupts a holder, and
//! host callbacks never run while one of these locks is held. Poisoning is
//! therefore recovered from instead of being surfaced as an error.

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering the inner value if a previous holder panicked.
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Recovering poisoned lock; a previous holder panicked");
        poisoned.into_inner()
    })
}
