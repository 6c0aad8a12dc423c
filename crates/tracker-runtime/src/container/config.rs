//! # Tracker Configuration
//!
//! Unified configuration for storage and both engines.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `FT_DATA_FILE` | `storage.data_file` |
//! | `FT_IN_MEMORY` | `storage.in_memory` (`1`/`true`) |
//! | `FT_STORE_TIMEOUT_MS` | both engines' store timeout |
//! | `FT_DEFAULT_LIFESPAN_DAYS` | `projection.default_lifespan_days` |

use std::path::PathBuf;

use ft_02_lifecycle::LifecycleConfig;
use ft_03_projection::ProjectionConfig;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound for the default lifespan, roughly a century.
pub const MAX_LIFESPAN_DAYS: i64 = 36_500;

/// Complete tracker configuration.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Lifecycle engine configuration.
    pub lifecycle: LifecycleConfig,
    /// Projection engine configuration.
    pub projection: ProjectionConfig,
}

impl TrackerConfig {
    /// Check the configuration before wiring anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lifecycle.store_timeout_ms == 0 || self.projection.store_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let days = self.projection.default_lifespan_days;
        if !(1..=MAX_LIFESPAN_DAYS).contains(&days) {
            return Err(ConfigError::LifespanOutOfRange {
                days,
                max: MAX_LIFESPAN_DAYS,
            });
        }
        if !self.storage.in_memory && self.storage.data_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingDataFile);
        }
        Ok(())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("FT_DATA_FILE") {
            self.storage.data_file = PathBuf::from(path);
        }
        if let Some(flag) = lookup("FT_IN_MEMORY") {
            self.storage.in_memory = matches!(flag.trim(), "1" | "true" | "yes");
        }
        if let Some(raw) = lookup("FT_STORE_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => {
                    self.lifecycle.store_timeout_ms = ms;
                    self.projection.store_timeout_ms = ms;
                }
                Err(_) => warn!(value = %raw, "[runtime] FT_STORE_TIMEOUT_MS is not a number"),
            }
        }
        if let Some(raw) = lookup("FT_DEFAULT_LIFESPAN_DAYS") {
            match raw.trim().parse::<i64>() {
                Ok(days) => self.projection.default_lifespan_days = days,
                Err(_) => warn!(value = %raw, "[runtime] FT_DEFAULT_LIFESPAN_DAYS is not a number"),
            }
        }
    }
}

/// Load configuration from defaults and environment.
pub fn load_config() -> TrackerConfig {
    let mut config = TrackerConfig::default();
    config.apply_overrides(|name| std::env::var(name).ok());
    info!(
        data_file = ?config.storage.data_file,
        in_memory = config.storage.in_memory,
        "[runtime] configuration loaded"
    );
    config
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A store timeout of zero would fail every call.
    #[error("Store timeout must be greater than zero (FT_STORE_TIMEOUT_MS)")]
    ZeroTimeout,

    /// Default lifespan must lie in `1..=max` days.
    #[error("Default lifespan must be between 1 and {max} days, got {days} (FT_DEFAULT_LIFESPAN_DAYS)")]
    LifespanOutOfRange {
        /// Configured value
        days: i64,
        /// Largest accepted value
        max: i64,
    },

    /// Durable storage selected without a path.
    #[error("FT_DATA_FILE is empty and FT_IN_MEMORY is not set")]
    MissingDataFile,
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON ledger file.
    pub data_file: PathBuf,
    /// Use the volatile in-memory ledger instead of the file.
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./data/ledger.json"),
            in_memory: false,
        }
    }
}
