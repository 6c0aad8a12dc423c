//! Read scopes for the recent-records and stats queries.

use serde::{Deserialize, Serialize};

use crate::actor::{normalize_identity, ActorContext};
use crate::client::ClientName;
use crate::entities::UnitRecord;

/// Which records a read query covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RecordScope {
    /// Every record in the global ledger.
    All,
    /// The per-client view of one client.
    Client(ClientName),
    /// Records the identity took part in at any stage.
    Actor(String),
}

impl RecordScope {
    /// Resolve the scope for a caller.
    ///
    /// An explicit client wins, then unrestricted roles see everything, and
    /// everyone else sees the records they touched.
    pub fn resolve(actor: &ActorContext, client: Option<ClientName>) -> Self {
        match client {
            Some(client) => RecordScope::Client(client),
            None if actor.role.is_unrestricted() => RecordScope::All,
            None => RecordScope::Actor(actor.normalized_identity()),
        }
    }

    /// Whether a global-ledger record falls in this scope.
    pub fn admits(&self, record: &UnitRecord) -> bool {
        match self {
            RecordScope::All => true,
            RecordScope::Client(client) => record
                .client
                .as_ref()
                .map(|c| c == client)
                .unwrap_or(false),
            RecordScope::Actor(identity) => record.involves_actor(&normalize_identity(identity)),
        }
    }
}
