//! # Engine Container
//!
//! Holds the ledger backend and the engines built on it.
//!
//! ```text
//! ft-01 ledger (file or memory) ──┬──→ ft-02 LifecycleService
//!                                 ├──→ ft-02 ClientAdminService
//!                                 └──→ ft-03 ProjectionService
//! ```

use std::sync::Arc;

use ft_01_ledger_store::{
    ClientDirectory, FileLedger, InMemoryLedger, LedgerStore, StoreError, SystemTimeSource,
    TimeSource,
};
use ft_02_lifecycle::{ClientAdminService, LifecycleDependencies, LifecycleService};
use ft_03_projection::ProjectionService;
use tracing::info;

use crate::container::config::TrackerConfig;

/// Central container holding every engine instance.
pub struct EngineContainer {
    /// Lifecycle engine (ft-02).
    pub lifecycle: Arc<LifecycleService>,
    /// Client administration (ft-02).
    pub clients: Arc<ClientAdminService>,
    /// Projection and reporting (ft-03).
    pub projection: Arc<ProjectionService>,
    /// Configuration used to build the container.
    pub config: TrackerConfig,
}

impl EngineContainer {
    /// Open the configured ledger and wire the engines with the system clock.
    pub fn new(config: TrackerConfig) -> Result<Self, StoreError> {
        let clock: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
        if config.storage.in_memory {
            info!("[runtime] using in-memory ledger");
            let ledger = Arc::new(InMemoryLedger::new());
            Ok(Self::with_backend(config, ledger.clone(), ledger, clock))
        } else {
            let ledger = Arc::new(FileLedger::open(&config.storage.data_file)?);
            Ok(Self::with_backend(config, ledger.clone(), ledger, clock))
        }
    }

    /// Wire the engines over explicit backends.
    pub fn with_backend(
        config: TrackerConfig,
        ledger: Arc<dyn LedgerStore>,
        directory: Arc<dyn ClientDirectory>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let deps = LifecycleDependencies::new(ledger.clone(), directory, clock.clone());
        let lifecycle = Arc::new(LifecycleService::new(config.lifecycle.clone(), deps.clone()));
        let clients = Arc::new(ClientAdminService::new(config.lifecycle.clone(), deps));
        let projection = Arc::new(ProjectionService::new(
            config.projection.clone(),
            ledger,
            clock,
        ));
        Self {
            lifecycle,
            clients,
            projection,
            config,
        }
    }
}
