//! # Projection Service
//!
//! Read-only service over the ledger. Never writes.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use ft_01_ledger_store::{LedgerStore, StoreError, TimeSource};
use shared_types::{ClientName, RecordScope, UnitRecord};
use tracing::{debug, info, warn};

use crate::algorithms::{most_recent, project, tally};
use crate::config::ProjectionConfig;
use crate::domain::{LedgerStats, ProjectionError, ProjectionResult};
use crate::ports::{ProjectionApi, ReportingApi};

/// Projection and reporting service.
pub struct ProjectionService {
    config: ProjectionConfig,
    ledger: Arc<dyn LedgerStore>,
    clock: Arc<dyn TimeSource>,
}

impl ProjectionService {
    /// Create a new projection service.
    pub fn new(
        config: ProjectionConfig,
        ledger: Arc<dyn LedgerStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            ledger,
            clock,
        }
    }

    async fn read<T, F>(&self, operation: &'static str, call: F) -> Result<T, ProjectionError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.config.store_timeout(), call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                warn!(operation, error = %source, "[ft-03] ledger read failed");
                Err(ProjectionError::StoreUnavailable { operation, source })
            }
            Err(_) => {
                warn!(operation, timeout_ms = self.config.store_timeout_ms, "[ft-03] ledger read timed out");
                Err(ProjectionError::StoreUnavailable {
                    operation,
                    source: StoreError::Unavailable {
                        message: format!("timed out after {}ms", self.config.store_timeout_ms),
                    },
                })
            }
        }
    }

    async fn records_in(&self, scope: &RecordScope) -> Result<Vec<UnitRecord>, ProjectionError> {
        match scope {
            RecordScope::Client(client) => {
                self.read("client-view", self.ledger.scan_client_view(client))
                    .await
            }
            RecordScope::All => self.read("scan", self.ledger.scan_all()).await,
            RecordScope::Actor(_) => {
                let all = self.read("scan", self.ledger.scan_all()).await?;
                Ok(all.into_iter().filter(|r| scope.admits(r)).collect())
            }
        }
    }
}

#[async_trait]
impl ProjectionApi for ProjectionService {
    async fn project(
        &self,
        client_filter: Option<ClientName>,
    ) -> Result<ProjectionResult, ProjectionError> {
        let mut records = self.read("scan", self.ledger.scan_all()).await?;
        if let Some(client) = &client_filter {
            records.retain(|r| r.client.as_ref() == Some(client));
        }

        let result = project(&records, self.config.default_lifespan_days);
        info!(
            client = client_filter.as_ref().map(|c| c.as_str()).unwrap_or("*"),
            samples = result.stats.total_samples,
            forecasts = result.stats.forecast_count,
            "[ft-03] 📈 projection computed"
        );
        Ok(result)
    }
}

#[async_trait]
impl ReportingApi for ProjectionService {
    async fn list_recent(
        &self,
        scope: &RecordScope,
        limit: Option<usize>,
    ) -> Result<Vec<UnitRecord>, ProjectionError> {
        let limit = limit
            .unwrap_or(self.config.default_recent_limit)
            .min(self.config.max_recent_limit);
        let records = self.records_in(scope).await?;
        debug!(?scope, limit, in_scope = records.len(), "[ft-03] recent records");
        Ok(most_recent(records, limit))
    }

    async fn compute_stats(&self, scope: &RecordScope) -> Result<LedgerStats, ProjectionError> {
        let records = self.records_in(scope).await?;
        Ok(tally(&records, self.clock.today()))
    }
}
