//! Row shapes accepted and returned by the ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{ClientName, RecordId, StageStamp, UnitKey, UnitRecord};

/// Fields of a first-seen unit. The store assigns the id on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDraft {
    /// Natural key.
    pub key: UnitKey,
    /// Identity of the storing actor.
    pub actor_plant: String,
    /// STORED stamp.
    pub stored_at: StageStamp,
}

impl UnitDraft {
    /// Materialize the draft under its assigned id.
    pub fn into_record(self, id: RecordId) -> UnitRecord {
        UnitRecord::stored(id, &self.key, &self.actor_plant, self.stored_at)
    }
}

/// Client directory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntry {
    /// Display name.
    pub name: ClientName,
    /// Day the client was first registered.
    pub registered_on: NaiveDate,
}
