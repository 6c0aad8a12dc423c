//! # Inbound Ports (Driving Ports)
//!
//! API exposed by the lifecycle subsystem to the runtime.

use async_trait::async_trait;
use ft_01_ledger_store::ClientEntry;
use shared_types::ActorContext;

use crate::domain::{AdvanceResult, DirectoryError, LifecycleError, TransitionPayload};

/// Lifecycle API.
#[async_trait]
pub trait LifecycleApi: Send + Sync {
    /// Advance the unit behind `code` by one stage.
    ///
    /// At most one scan per unit is in flight at a time; concurrent scans of
    /// the same code are applied one after another.
    async fn scan_code(
        &self,
        code: &str,
        actor: &ActorContext,
        payload: TransitionPayload,
    ) -> Result<AdvanceResult, LifecycleError>;
}

/// Client directory administration API.
#[async_trait]
pub trait ClientAdminApi: Send + Sync {
    /// All registered clients.
    async fn list_clients(&self) -> Result<Vec<ClientEntry>, DirectoryError>;

    /// Register a new client.
    async fn register_client(&self, name: &str) -> Result<ClientEntry, DirectoryError>;

    /// Remove a client that no record references.
    async fn delete_client(&self, name: &str) -> Result<(), DirectoryError>;
}
