//! # Ledger Tables
//!
//! Backend-independent table logic shared by every adapter.
//!
//! ## Layout
//!
//! ```text
//! records       Vec<UnitRecord>                 id = position + 1
//! key_index     UnitKey → position              rebuilt on load
//! client_views  CLIENT KEY → {RecordId}         per-client view index
//! clients       CLIENT KEY → ClientEntry        client directory
//! ```
//!
//! A per-client view never stores copies; it resolves ids against `records`,
//! so a view always shows current global fields.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{ClientName, RecordId, UnitKey, UnitRecord};

use super::entities::{ClientEntry, UnitDraft};
use super::errors::StoreError;

/// In-process representation of the whole ledger.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LedgerTables {
    records: Vec<UnitRecord>,
    #[serde(skip)]
    key_index: HashMap<UnitKey, usize>,
    #[serde(default)]
    client_views: BTreeMap<String, BTreeSet<RecordId>>,
    #[serde(default)]
    clients: BTreeMap<String, ClientEntry>,
}

impl LedgerTables {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with existing rows. Dispatched rows are linked into
    /// their client's view.
    pub fn from_records(records: Vec<UnitRecord>) -> Result<Self, StoreError> {
        let mut tables = Self {
            records,
            ..Self::default()
        };
        tables.rebuild_index()?;
        let linked: Vec<(ClientName, RecordId)> = tables
            .records
            .iter()
            .filter_map(|r| r.client.clone().map(|client| (client, r.id)))
            .collect();
        for (client, id) in linked {
            tables.link_client_view(&client, id)?;
        }
        Ok(tables)
    }

    /// Recompute derived indexes after deserialization.
    pub fn rebuild_index(&mut self) -> Result<(), StoreError> {
        self.key_index.clear();
        for (position, record) in self.records.iter().enumerate() {
            if record.id != RecordId(position as u64 + 1) {
                return Err(StoreError::Serialization {
                    message: format!(
                        "row {} carries id {}, ledger ids must be sequential",
                        position + 1,
                        record.id
                    ),
                });
            }
            if self.key_index.insert(record.key(), position).is_some() {
                return Err(StoreError::DuplicateKey { key: record.key() });
            }
        }
        Ok(())
    }

    /// Number of global rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the global ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_key(&self, key: &UnitKey) -> Option<UnitRecord> {
        self.key_index
            .get(key)
            .and_then(|position| self.records.get(*position))
            .cloned()
    }

    /// Append a new row with id = row count + 1.
    pub fn append(&mut self, draft: UnitDraft) -> Result<UnitRecord, StoreError> {
        if self.key_index.contains_key(&draft.key) {
            return Err(StoreError::DuplicateKey { key: draft.key });
        }
        let position = self.records.len();
        let record = draft.into_record(RecordId(position as u64 + 1));
        self.key_index.insert(record.key(), position);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Replace the row behind `handle`.
    pub fn update(&mut self, handle: RecordId, record: UnitRecord) -> Result<(), StoreError> {
        let slot = handle
            .0
            .checked_sub(1)
            .and_then(|position| self.records.get_mut(position as usize))
            .ok_or(StoreError::RowNotFound { id: handle })?;

        let stored = slot.key();
        let attempted = record.key();
        if stored != attempted || record.id != handle {
            return Err(StoreError::KeyMismatch {
                id: handle,
                stored,
                attempted,
            });
        }
        *slot = record;
        Ok(())
    }

    pub fn scan_all(&self) -> Vec<UnitRecord> {
        self.records.clone()
    }

    /// Rows linked into `client`'s view, in id order.
    pub fn scan_client_view(&self, client: &ClientName) -> Vec<UnitRecord> {
        self.client_views
            .get(&client.key())
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| {
                        id.0.checked_sub(1)
                            .and_then(|position| self.records.get(position as usize))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Link a row into a client's view. Idempotent.
    pub fn link_client_view(&mut self, client: &ClientName, id: RecordId) -> Result<(), StoreError> {
        if id.0 == 0 || id.0 as usize > self.records.len() {
            return Err(StoreError::RowNotFound { id });
        }
        self.client_views.entry(client.key()).or_default().insert(id);
        Ok(())
    }

    pub fn client_view_contains(&self, client: &ClientName, id: RecordId) -> bool {
        self.client_views
            .get(&client.key())
            .map(|ids| ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn find_client(&self, name: &ClientName) -> Option<ClientEntry> {
        self.clients.get(&name.key()).cloned()
    }

    /// Create the client if absent. Returns `true` when created.
    pub fn ensure_client(&mut self, name: &ClientName, today: NaiveDate) -> bool {
        if self.clients.contains_key(&name.key()) {
            return false;
        }
        self.clients.insert(
            name.key(),
            ClientEntry {
                name: name.clone(),
                registered_on: today,
            },
        );
        true
    }

    /// Create the client, failing if it exists.
    pub fn register_client(
        &mut self,
        name: &ClientName,
        today: NaiveDate,
    ) -> Result<ClientEntry, StoreError> {
        if self.clients.contains_key(&name.key()) {
            return Err(StoreError::ClientExists { name: name.key() });
        }
        let entry = ClientEntry {
            name: name.clone(),
            registered_on: today,
        };
        self.clients.insert(name.key(), entry.clone());
        Ok(entry)
    }

    /// Clients ordered by normalized name.
    pub fn list_clients(&self) -> Vec<ClientEntry> {
        self.clients.values().cloned().collect()
    }

    /// Remove a client and its view index. Returns `true` if it existed.
    pub fn remove_client(&mut self, name: &ClientName) -> bool {
        self.client_views.remove(&name.key());
        self.clients.remove(&name.key()).is_some()
    }
}
