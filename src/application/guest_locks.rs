//! Per-guest write serialization.
//!
//! The conversation store offers no isolation, so two pipeline runs for the
//! same guest that both load, append and save would lose one run's turns.
//! Holding a [`GuestLockGuard`] across the read-modify-write makes runs for
//! one guest take turns while runs for different guests stay concurrent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::GuestId;

/// Keyed async mutex, one entry per guest with an active or waiting run.
#[derive(Default)]
pub struct GuestLocks {
    locks: Mutex<HashMap<GuestId, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one guest's conversation until dropped.
#[derive(Debug)]
pub struct GuestLockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl GuestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other run holds the guest's lock.
    pub async fn acquire(&self, guest_id: &GuestId) -> GuestLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries only referenced by the map have no holder or waiter.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(guest_id.clone()).or_default().clone()
        };

        GuestLockGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of guests currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
