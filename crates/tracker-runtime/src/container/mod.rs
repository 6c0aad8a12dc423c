//! # Engine Container
//!
//! Configuration and dependency injection for the tracker engines.

pub mod config;
pub mod subsystems;

pub use config::{load_config, ConfigError, StorageConfig, TrackerConfig, MAX_LIFESPAN_DAYS};
pub use subsystems::EngineContainer;
