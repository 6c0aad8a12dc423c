//! # Actor Context
//!
//! The already-authenticated caller of an engine operation. Role checks are
//! resolved upstream; the engines trust this value as given.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::ClientName;

/// Declared role of the scanning actor.
///
/// The aliases accept the role labels stored by the user directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// Workshop mechanic (stores, installs and uninstalls).
    #[default]
    #[serde(alias = "mecanico")]
    Mechanic,
    /// Warehouse dispatcher; must name a client when dispatching.
    #[serde(alias = "despacho")]
    Dispatcher,
    /// Client administrator, scoped to one client.
    #[serde(alias = "administrador")]
    Admin,
    /// Unrestricted administrator.
    #[serde(alias = "super")]
    SuperAdmin,
}

impl ActorRole {
    /// Whether the role sees every client's records.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, ActorRole::SuperAdmin)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActorRole::Mechanic => "mechanic",
            ActorRole::Dispatcher => "dispatcher",
            ActorRole::Admin => "admin",
            ActorRole::SuperAdmin => "superadmin",
        };
        f.write_str(label)
    }
}

/// Identity, role and claimed client of the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// User identity stamped into the actor fields of a record.
    pub identity: String,
    /// Declared role.
    pub role: ActorRole,
    /// Client the actor works for or is dispatching to.
    #[serde(default)]
    pub client_hint: Option<ClientName>,
}

impl ActorContext {
    /// Actor without a client.
    pub fn new(identity: impl Into<String>, role: ActorRole) -> Self {
        Self {
            identity: identity.into().trim().to_string(),
            role,
            client_hint: None,
        }
    }

    /// Attach a claimed client. Blank names are ignored.
    pub fn with_client(mut self, client: &str) -> Self {
        self.client_hint = ClientName::parse(client);
        self
    }

    /// Identity used when matching actor fields (trimmed, lowercase).
    pub fn normalized_identity(&self) -> String {
        normalize_identity(&self.identity)
    }
}

/// Normalize a stored or supplied identity for comparison.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}
