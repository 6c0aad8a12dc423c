//! # Outbound Ports (Driven Ports)
//!
//! Interfaces the engines use to reach persistent state.
//!
//! All row access is potentially blocking I/O against a remote backend, so
//! every method is async. Callers are expected to bound each call with a
//! timeout.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use shared_types::{ClientName, RecordId, UnitKey, UnitRecord};

use crate::domain::{ClientEntry, StoreError, UnitDraft};

/// Row-oriented unit ledger with per-client views.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Look up a unit by its natural key.
    async fn find_by_key(&self, key: &UnitKey) -> Result<Option<UnitRecord>, StoreError>;

    /// Append a first-seen unit. The store assigns `id = row count + 1`.
    async fn append_row(&self, draft: UnitDraft) -> Result<UnitRecord, StoreError>;

    /// Every global row in id order.
    async fn scan_all(&self) -> Result<Vec<UnitRecord>, StoreError>;

    /// Overwrite the row behind `handle`. The natural key must not change.
    async fn update_row(&self, handle: RecordId, record: UnitRecord) -> Result<(), StoreError>;

    /// Rows in a client's view, in id order.
    async fn scan_client_view(&self, client: &ClientName) -> Result<Vec<UnitRecord>, StoreError>;

    /// Add a row to a client's view. Idempotent.
    async fn link_client_view(&self, client: &ClientName, id: RecordId) -> Result<(), StoreError>;

    /// Whether a client's view already includes the row.
    async fn client_view_contains(
        &self,
        client: &ClientName,
        id: RecordId,
    ) -> Result<bool, StoreError>;
}

/// Keyed client table.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Look up a client by normalized name.
    async fn find_client(&self, name: &ClientName) -> Result<Option<ClientEntry>, StoreError>;

    /// Create the client if absent. Returns `true` when it was created.
    async fn ensure_client(&self, name: &ClientName, today: NaiveDate) -> Result<bool, StoreError>;

    /// Create the client, failing with `ClientExists` if present.
    async fn register_client(
        &self,
        name: &ClientName,
        today: NaiveDate,
    ) -> Result<ClientEntry, StoreError>;

    /// All clients ordered by normalized name.
    async fn list_clients(&self) -> Result<Vec<ClientEntry>, StoreError>;

    /// Remove a client. Returns `false` if it did not exist.
    async fn remove_client(&self, name: &ClientName) -> Result<bool, StoreError>;
}

/// Abstract time source for stage stamps.
pub trait TimeSource: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
