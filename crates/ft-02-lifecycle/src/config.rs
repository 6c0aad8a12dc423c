//! # Lifecycle Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Upper bound for a single ledger or directory call.
    pub store_timeout_ms: u64,
    /// Lock-table size above which idle slots are swept.
    pub lock_reclaim_threshold: usize,
    /// Minimum installer name length (after trim).
    pub min_installer_name_len: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            lock_reclaim_threshold: 1_024,
            min_installer_name_len: 2,
        }
    }
}

impl LifecycleConfig {
    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self {
            store_timeout_ms: 250,
            lock_reclaim_threshold: 4,
            ..Self::default()
        }
    }

    /// Store call timeout as a `Duration`.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
