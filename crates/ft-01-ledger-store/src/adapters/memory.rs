//! In-memory ledger for tests and ephemeral runs.
//!
//! Supports fault injection so engine failure paths can be exercised:
//! a full outage, failing view links or row updates only, and artificial
//! latency.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use shared_types::{ClientName, RecordId, UnitKey, UnitRecord};

use crate::domain::{ClientEntry, LedgerTables, StoreError, UnitDraft};
use crate::ports::{ClientDirectory, LedgerStore};

#[derive(Debug, Default)]
struct FaultPlan {
    unavailable: AtomicBool,
    view_links_fail: AtomicBool,
    updates_fail: AtomicBool,
    latency_ms: AtomicU64,
}

/// In-memory ledger store and client directory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    tables: RwLock<LedgerTables>,
    faults: FaultPlan,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger holding existing rows.
    pub fn with_records(records: Vec<UnitRecord>) -> Result<Self, StoreError> {
        Ok(Self {
            tables: RwLock::new(LedgerTables::from_records(records)?),
            faults: FaultPlan::default(),
        })
    }

    /// Make every call fail with `Unavailable`.
    pub fn set_unavailable(&self, down: bool) {
        self.faults.unavailable.store(down, Ordering::SeqCst);
    }

    /// Make only `link_client_view` fail.
    pub fn set_view_link_failure(&self, fail: bool) {
        self.faults.view_links_fail.store(fail, Ordering::SeqCst);
    }

    /// Make only `update_row` fail.
    pub fn set_update_failure(&self, fail: bool) {
        self.faults.updates_fail.store(fail, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.faults
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of global rows.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Whether the ledger holds no rows.
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    async fn gate(&self) -> Result<(), StoreError> {
        let latency = self.faults.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.faults.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "injected outage".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn find_by_key(&self, key: &UnitKey) -> Result<Option<UnitRecord>, StoreError> {
        self.gate().await?;
        Ok(self.tables.read().find_by_key(key))
    }

    async fn append_row(&self, draft: UnitDraft) -> Result<UnitRecord, StoreError> {
        self.gate().await?;
        self.tables.write().append(draft)
    }

    async fn scan_all(&self) -> Result<Vec<UnitRecord>, StoreError> {
        self.gate().await?;
        Ok(self.tables.read().scan_all())
    }

    async fn update_row(&self, handle: RecordId, record: UnitRecord) -> Result<(), StoreError> {
        self.gate().await?;
        if self.faults.updates_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: format!("injected update failure for row {}", handle),
            });
        }
        self.tables.write().update(handle, record)
    }

    async fn scan_client_view(&self, client: &ClientName) -> Result<Vec<UnitRecord>, StoreError> {
        self.gate().await?;
        Ok(self.tables.read().scan_client_view(client))
    }

    async fn link_client_view(&self, client: &ClientName, id: RecordId) -> Result<(), StoreError> {
        self.gate().await?;
        if self.faults.view_links_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: format!("injected view failure for {}", client),
            });
        }
        self.tables.write().link_client_view(client, id)
    }

    async fn client_view_contains(
        &self,
        client: &ClientName,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        self.gate().await?;
        Ok(self.tables.read().client_view_contains(client, id))
    }
}

#[async_trait]
impl ClientDirectory for InMemoryLedger {
    async fn find_client(&self, name: &ClientName) -> Result<Option<ClientEntry>, StoreError> {
        self.gate().await?;
        Ok(self.tables.read().find_client(name))
    }

    async fn ensure_client(&self, name: &ClientName, today: NaiveDate) -> Result<bool, StoreError> {
        self.gate().await?;
        Ok(self.tables.write().ensure_client(name, today))
    }

    async fn register_client(
        &self,
        name: &ClientName,
        today: NaiveDate,
    ) -> Result<ClientEntry, StoreError> {
        self.gate().await?;
        self.tables.write().register_client(name, today)
    }

    async fn list_clients(&self) -> Result<Vec<ClientEntry>, StoreError> {
        self.gate().await?;
        Ok(self.tables.read().list_clients())
    }

    async fn remove_client(&self, name: &ClientName) -> Result<bool, StoreError> {
        self.gate().await?;
        Ok(self.tables.write().remove_client(name))
    }
}
