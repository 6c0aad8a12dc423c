//! # Client Administration
//!
//! List, register and delete directory entries. Deletion is refused while any
//! global record still references the client, because `client` is immutable
//! on records. Deletion holds the client's lock, so a dispatch to that client
//! is either fully counted or starts after the entry is gone.

use std::sync::Arc;

use async_trait::async_trait;
use ft_01_ledger_store::{ClientDirectory, ClientEntry, LedgerStore, StoreError, TimeSource};
use shared_types::ClientName;
use tracing::{info, warn};

use crate::config::LifecycleConfig;
use crate::domain::{DirectoryError, StoreOp};
use crate::locks::ClientLocks;
use crate::ports::ClientAdminApi;
use crate::service::{bounded, LifecycleDependencies};

/// Client directory administration service.
pub struct ClientAdminService {
    config: LifecycleConfig,
    ledger: Arc<dyn LedgerStore>,
    directory: Arc<dyn ClientDirectory>,
    clock: Arc<dyn TimeSource>,
    client_locks: Arc<ClientLocks>,
}

impl ClientAdminService {
    /// Create a new administration service over the lifecycle's ports.
    pub fn new(config: LifecycleConfig, deps: LifecycleDependencies) -> Self {
        Self {
            config,
            ledger: deps.ledger,
            directory: deps.directory,
            clock: deps.clock,
            client_locks: deps.client_locks,
        }
    }

    async fn call<T>(
        &self,
        op: StoreOp,
        name: &str,
        call: impl std::future::Future<Output = Result<T, StoreError>>,
    ) -> Result<T, DirectoryError> {
        bounded(&self.config, op, name, call)
            .await
            .map_err(|(op, source)| DirectoryError::StoreUnavailable { op, source })
    }
}

fn parse_name(raw: &str) -> Result<ClientName, DirectoryError> {
    ClientName::parse(raw).ok_or(DirectoryError::InvalidClientName)
}

#[async_trait]
impl ClientAdminApi for ClientAdminService {
    async fn list_clients(&self) -> Result<Vec<ClientEntry>, DirectoryError> {
        self.call(StoreOp::ClientDirectory, "*", self.directory.list_clients())
            .await
    }

    async fn register_client(&self, name: &str) -> Result<ClientEntry, DirectoryError> {
        let name = parse_name(name)?;
        let today = self.clock.today();
        match bounded(
            &self.config,
            StoreOp::ClientDirectory,
            name.as_str(),
            self.directory.register_client(&name, today),
        )
        .await
        {
            Ok(entry) => {
                info!(client = %entry.name, "[ft-02] client registered");
                Ok(entry)
            }
            Err((_, StoreError::ClientExists { name })) => {
                Err(DirectoryError::ClientAlreadyExists { name })
            }
            Err((op, source)) => Err(DirectoryError::StoreUnavailable { op, source }),
        }
    }

    async fn delete_client(&self, name: &str) -> Result<(), DirectoryError> {
        let name = parse_name(name)?;
        let _guard = self.client_locks.acquire(&name.key()).await;

        let existing = self
            .call(
                StoreOp::ClientDirectory,
                name.as_str(),
                self.directory.find_client(&name),
            )
            .await?;
        if existing.is_none() {
            return Err(DirectoryError::ClientNotFound {
                name: name.to_string(),
            });
        }

        let records = self
            .call(StoreOp::Scan, name.as_str(), self.ledger.scan_all())
            .await?;
        let count = records
            .iter()
            .filter(|r| r.client.as_ref() == Some(&name))
            .count();
        if count > 0 {
            warn!(client = %name, count, "[ft-02] client deletion blocked by records");
            return Err(DirectoryError::ClientHasRecords {
                name: name.to_string(),
                count,
            });
        }

        let removed = self
            .call(
                StoreOp::ClientDirectory,
                name.as_str(),
                self.directory.remove_client(&name),
            )
            .await?;
        if !removed {
            return Err(DirectoryError::ClientNotFound {
                name: name.to_string(),
            });
        }
        info!(client = %name, "[ft-02] client deleted");
        Ok(())
    }
}
