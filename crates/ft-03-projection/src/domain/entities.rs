//! Projection and reporting results.

use chrono::NaiveDate;
use serde::Serialize;

/// Bucket label for records without a client.
pub const UNASSIGNED_CLIENT: &str = "UNASSIGNED";

/// Cohort identity: normalized client key and reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CohortKey {
    /// Uppercase client key, or [`UNASSIGNED_CLIENT`].
    pub client: String,
    /// Product reference.
    pub reference: String,
}

/// One completed install/uninstall pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationSample {
    /// Cohort the sample belongs to.
    pub cohort: CohortKey,
    /// Whole days between install and uninstall (always positive).
    pub days: i64,
}

/// Forecast for one currently installed unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Forecast {
    /// Client display name, or [`UNASSIGNED_CLIENT`].
    pub client: String,
    /// Product reference.
    pub reference: String,
    /// Unit serial.
    pub serial: String,
    /// Vehicle plate.
    pub plate: Option<String>,
    /// Installation day.
    pub installed_on: NaiveDate,
    /// Cohort mean (or the default lifespan).
    pub mean_duration_days: i64,
    /// `installed_on + mean_duration_days`.
    pub estimated_replacement: NaiveDate,
    /// Whether the mean came from history rather than the default.
    pub from_history: bool,
}

/// Aggregate figures over a projection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionStats {
    /// Completed pairs analyzed.
    pub total_samples: usize,
    /// Mean over all samples, rounded half-up; 0 with no samples.
    pub overall_mean_days: i64,
    /// Number of forecasts.
    pub forecast_count: usize,
}

/// Result of `project`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionResult {
    /// Forecasts, earliest replacement first.
    pub forecasts: Vec<Forecast>,
    /// Aggregates.
    pub stats: ProjectionStats,
}

/// Per-state counts over a scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    /// Records in scope.
    pub total: usize,
    /// Records in STORED.
    pub stored: usize,
    /// Records in DISPATCHED.
    pub dispatched: usize,
    /// Records in INSTALLED.
    pub installed: usize,
    /// Records in UNINSTALLED.
    pub uninstalled: usize,
    /// Records with any stage stamped today.
    pub today: usize,
}
