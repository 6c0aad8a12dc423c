//! # FT-03 Projection Engine
//!
//! Read-only analysis of the unit ledger.
//!
//! **Subsystem ID:** 03
//!
//! ## Operations
//!
//! | Operation | Reads | Produces |
//! |-----------|-------|----------|
//! | `project` | global ledger | forecasts + aggregate stats |
//! | `list_recent` | scope | newest N records |
//! | `compute_stats` | scope | per-state counts + today |
//!
//! ## Projection
//!
//! 1. Completed (UNINSTALLED) units yield duration samples per
//!    `(client, reference)` cohort.
//! 2. Each cohort's mean is rounded half-up.
//! 3. Installed units are forecast at `install + mean`, or
//!    `install + default_lifespan_days` with no history.
//!
//! ## Module Structure
//!
//! ```text
//! ft-03-projection/
//! ├── algorithms/  # projection math, recent/tally helpers (pure)
//! ├── domain/      # results, scope resolution, errors
//! ├── ports/       # ProjectionApi, ReportingApi
//! ├── service.rs   # ProjectionService
//! └── config.rs    # ProjectionConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::ProjectionConfig;
pub use domain::{
    resolve_projection_filter, CohortKey, DurationSample, Forecast, LedgerStats, ProjectionError,
    ProjectionResult, ProjectionStats, UNASSIGNED_CLIENT,
};
pub use ports::{ProjectionApi, ReportingApi};
pub use service::ProjectionService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
