//! # Keyed Lock Table
//!
//! Serializes work per key: transitions per `REFERENCE|SERIAL`, and client
//! directory changes per normalized client name. Each key gets an async mutex
//! created on first use; the table only holds weak references, so a slot is
//! dead as soon as its last holder or waiter releases it. Dead slots are swept
//! once the table grows past the reclaim threshold.
//!
//! Different keys never contend, and there is no global lock across units.

use std::hash::Hash;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use shared_types::UnitKey;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Exclusive access to one key. Released on drop.
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Arena of per-key async mutexes.
pub struct KeyedLocks<K = UnitKey> {
    slots: DashMap<K, Weak<Mutex<()>>>,
    reclaim_threshold: usize,
}

/// Lock table keyed by normalized client name.
pub type ClientLocks = KeyedLocks<String>;

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    /// Create an empty table that sweeps idle slots above `reclaim_threshold`.
    pub fn new(reclaim_threshold: usize) -> Self {
        Self {
            slots: DashMap::new(),
            reclaim_threshold: reclaim_threshold.max(1),
        }
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: &K) -> KeyGuard {
        let slot = self.slot(key);
        KeyGuard {
            _guard: slot.lock_owned().await,
        }
    }

    fn slot(&self, key: &K) -> Arc<Mutex<()>> {
        if self.slots.len() > self.reclaim_threshold {
            self.reclaim();
        }

        let mut entry = self.slots.entry(key.clone()).or_default();
        match entry.upgrade() {
            Some(live) => live,
            None => {
                let fresh = Arc::new(Mutex::new(()));
                *entry = Arc::downgrade(&fresh);
                fresh
            }
        }
    }

    /// Drop slots nobody holds or waits on. Returns how many were removed.
    pub fn reclaim(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.strong_count() > 0);
        let removed = before.saturating_sub(self.slots.len());
        if removed > 0 {
            debug!(removed, remaining = self.slots.len(), "[ft-02] reclaimed idle key locks");
        }
        removed
    }

    /// Number of slots currently tracked, live or dead.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are tracked.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
