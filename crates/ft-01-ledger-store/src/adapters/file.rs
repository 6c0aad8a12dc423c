//! File-backed ledger.
//!
//! Keeps the tables in memory and rewrites a JSON snapshot after every
//! mutation. Writes go through a temp file followed by a rename, so a crash
//! leaves either the old or the new snapshot on disk. Disk work runs on the
//! blocking pool, so store timeouts can fire while a write is in progress.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::{ClientName, RecordId, UnitKey, UnitRecord};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{ClientEntry, LedgerTables, StoreError, UnitDraft};
use crate::ports::{ClientDirectory, LedgerStore};

struct Shared {
    tables: Mutex<LedgerTables>,
    path: PathBuf,
}

/// Durable ledger store persisted as a single JSON document.
pub struct FileLedger {
    shared: Arc<Shared>,
}

impl FileLedger {
    /// Open the ledger at `path`, starting empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let tables = if path.exists() {
            let bytes = std::fs::read(&path)?;
            let mut tables: LedgerTables = serde_json::from_slice(&bytes)?;
            tables.rebuild_index()?;
            info!(
                "[ft-01] 💾 Loaded {} rows from {}",
                tables.len(),
                path.display()
            );
            tables
        } else {
            info!("[ft-01] 📁 No ledger file at {}, starting empty", path.display());
            LedgerTables::new()
        };

        Ok(Self {
            shared: Arc::new(Shared {
                tables: Mutex::new(tables),
                path,
            }),
        })
    }

    /// Location of the snapshot.
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Apply a mutation and persist it. The in-memory state rolls back if the
    /// write fails.
    ///
    /// The work runs on its own task, so a caller that gives up (timeout or
    /// drop) never leaves memory and disk out of step: the mutation either
    /// lands in both or in neither.
    async fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut LedgerTables) -> Result<T, StoreError> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let mut tables = shared.tables.lock().await;
            let mut staged = tables.clone();
            let out = op(&mut staged)?;
            let bytes = serde_json::to_vec_pretty(&staged)?;
            let path = shared.path.clone();
            tokio::task::spawn_blocking(move || write_snapshot(&path, &bytes))
                .await
                .map_err(join_failure)??;
            debug!(rows = staged.len(), path = %shared.path.display(), "[ft-01] snapshot written");
            *tables = staged;
            Ok::<T, StoreError>(out)
        });
        task.await.map_err(join_failure)?
    }
}

/// Write `bytes` through a temp file and rename it over `path`.
fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, bytes)?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

fn join_failure(e: tokio::task::JoinError) -> StoreError {
    warn!(error = %e, "[ft-01] ledger write task failed");
    StoreError::Io {
        message: format!("ledger write task failed: {}", e),
    }
}

#[async_trait]
impl LedgerStore for FileLedger {
    async fn find_by_key(&self, key: &UnitKey) -> Result<Option<UnitRecord>, StoreError> {
        Ok(self.shared.tables.lock().await.find_by_key(key))
    }

    async fn append_row(&self, draft: UnitDraft) -> Result<UnitRecord, StoreError> {
        self.mutate(move |tables| tables.append(draft)).await
    }

    async fn scan_all(&self) -> Result<Vec<UnitRecord>, StoreError> {
        Ok(self.shared.tables.lock().await.scan_all())
    }

    async fn update_row(&self, handle: RecordId, record: UnitRecord) -> Result<(), StoreError> {
        self.mutate(move |tables| tables.update(handle, record)).await
    }

    async fn scan_client_view(&self, client: &ClientName) -> Result<Vec<UnitRecord>, StoreError> {
        Ok(self.shared.tables.lock().await.scan_client_view(client))
    }

    async fn link_client_view(&self, client: &ClientName, id: RecordId) -> Result<(), StoreError> {
        if self.shared.tables.lock().await.client_view_contains(client, id) {
            return Ok(());
        }
        let client = client.clone();
        self.mutate(move |tables| tables.link_client_view(&client, id))
            .await
    }

    async fn client_view_contains(
        &self,
        client: &ClientName,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        Ok(self.shared.tables.lock().await.client_view_contains(client, id))
    }
}

#[async_trait]
impl ClientDirectory for FileLedger {
    async fn find_client(&self, name: &ClientName) -> Result<Option<ClientEntry>, StoreError> {
        Ok(self.shared.tables.lock().await.find_client(name))
    }

    async fn ensure_client(&self, name: &ClientName, today: NaiveDate) -> Result<bool, StoreError> {
        if self.shared.tables.lock().await.find_client(name).is_some() {
            return Ok(false);
        }
        let name = name.clone();
        self.mutate(move |tables| Ok(tables.ensure_client(&name, today)))
            .await
    }

    async fn register_client(
        &self,
        name: &ClientName,
        today: NaiveDate,
    ) -> Result<ClientEntry, StoreError> {
        let name = name.clone();
        self.mutate(move |tables| tables.register_client(&name, today))
            .await
    }

    async fn list_clients(&self) -> Result<Vec<ClientEntry>, StoreError> {
        Ok(self.shared.tables.lock().await.list_clients())
    }

    async fn remove_client(&self, name: &ClientName) -> Result<bool, StoreError> {
        let name = name.clone();
        self.mutate(move |tables| Ok(tables.remove_client(&name)))
            .await
    }
}
