//! # Algorithms
//!
//! Pure functions over ledger snapshots. No I/O.

pub mod projection;
pub mod reporting;

pub use projection::{cohort_means, collect_samples, forecast, project, round_half_up};
pub use reporting::{most_recent, tally};
