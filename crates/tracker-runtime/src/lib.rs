//! # Tracker Runtime Library
//!
//! Exposes the runtime's wiring and command handling for tests.
//! The entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration and engine wiring
//! - `handlers/` - JSON-lines command surface

#![warn(missing_docs)]

pub mod container;
pub mod handlers;

pub use container::{
    load_config, ConfigError, EngineContainer, StorageConfig, TrackerConfig, MAX_LIFESPAN_DAYS,
};
pub use handlers::{serve, Command, CommandHandler, ErrorBody, Response};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
