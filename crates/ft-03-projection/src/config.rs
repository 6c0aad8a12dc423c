//! # Projection Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Projection and reporting configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Lifespan assumed for a cohort with no completed history.
    pub default_lifespan_days: i64,
    /// Upper bound for a single ledger read.
    pub store_timeout_ms: u64,
    /// Records returned by `list_recent` when no limit is given.
    pub default_recent_limit: usize,
    /// Hard cap on `list_recent`.
    pub max_recent_limit: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_lifespan_days: 90,
            store_timeout_ms: 5_000,
            default_recent_limit: 10,
            max_recent_limit: 500,
        }
    }
}

impl ProjectionConfig {
    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self {
            store_timeout_ms: 250,
            ..Self::default()
        }
    }

    /// Ledger read timeout as a `Duration`.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
