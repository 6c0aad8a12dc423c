//! # Inbound Ports (Driving Ports)
//!
//! Read-only APIs over the ledger.

use async_trait::async_trait;
use shared_types::{ClientName, RecordScope, UnitRecord};

use crate::domain::{LedgerStats, ProjectionError, ProjectionResult};

/// Replacement projection API.
#[async_trait]
pub trait ProjectionApi: Send + Sync {
    /// Forecast replacements, optionally for one client.
    async fn project(
        &self,
        client_filter: Option<ClientName>,
    ) -> Result<ProjectionResult, ProjectionError>;
}

/// Recent records and counts.
#[async_trait]
pub trait ReportingApi: Send + Sync {
    /// Most recent records in scope, newest first. `None` uses the default limit.
    async fn list_recent(
        &self,
        scope: &RecordScope,
        limit: Option<usize>,
    ) -> Result<Vec<UnitRecord>, ProjectionError>;

    /// Per-state counts in scope.
    async fn compute_stats(&self, scope: &RecordScope) -> Result<LedgerStats, ProjectionError>;
}
