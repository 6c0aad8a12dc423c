//! # Domain Errors
//!
//! Error types for the lifecycle engine and client administration.
//!
//! `NeedsData`, `AlreadyCompleted` and `MirrorSyncFailed` are not errors; they
//! are reported through [`AdvanceResult`](super::AdvanceResult).

use ft_01_ledger_store::StoreError;
use shared_types::{ActorRole, CodeError, InvalidTransition, UnitKey};
use std::fmt;
use thiserror::Error;

/// Ledger operation that was in flight when a store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Natural-key lookup.
    Lookup,
    /// First-seen append.
    Append,
    /// Global row update.
    Update,
    /// Client directory read or write.
    ClientDirectory,
    /// Full ledger scan.
    Scan,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreOp::Lookup => "lookup",
            StoreOp::Append => "append",
            StoreOp::Update => "update",
            StoreOp::ClientDirectory => "client-directory",
            StoreOp::Scan => "scan",
        };
        f.write_str(label)
    }
}

/// Lifecycle engine error types.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Scanned text is not a `REFERENCE|SERIAL` code.
    #[error(transparent)]
    InvalidFormat(#[from] CodeError),

    /// Dispatch attempted without a client.
    #[error("Client required to dispatch {key}")]
    MissingClient {
        /// Unit being dispatched
        key: UnitKey,
        /// Role of the scanning actor
        role: ActorRole,
    },

    /// Backing store failed or timed out; nothing was written by this step.
    #[error("Ledger unavailable during {op} of {key}: {source}")]
    StoreUnavailable {
        /// Operation in flight
        op: StoreOp,
        /// Unit key, or `*` for whole-ledger operations
        key: String,
        /// Backend error
        #[source]
        source: StoreError,
    },

    /// Recorded state does not allow the computed step.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

impl LifecycleError {
    /// Message shown to the scanning user.
    pub fn user_message(&self) -> String {
        match self {
            LifecycleError::StoreUnavailable { .. } => {
                "The ledger is temporarily unavailable. Please try again.".to_string()
            }
            LifecycleError::MissingClient {
                key,
                role: ActorRole::Dispatcher,
            } => format!("Select a client before dispatching {}.", key),
            other => other.to_string(),
        }
    }

    /// Whether the caller sent bad input (as opposed to a backend failure).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            LifecycleError::InvalidFormat(_) | LifecycleError::MissingClient { .. }
        )
    }
}

/// Client administration error types.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Blank client name.
    #[error("Client name is required")]
    InvalidClientName,

    /// Name already registered.
    #[error("Client already exists: {name}")]
    ClientAlreadyExists {
        /// Normalized name
        name: String,
    },

    /// Name not registered.
    #[error("Client not found: {name}")]
    ClientNotFound {
        /// Requested name
        name: String,
    },

    /// Deletion blocked by records that reference the client.
    #[error("Client {name} cannot be deleted: {count} records reference it")]
    ClientHasRecords {
        /// Client name
        name: String,
        /// Referencing records
        count: usize,
    },

    /// Backing store failed or timed out.
    #[error("Client directory unavailable during {op}: {source}")]
    StoreUnavailable {
        /// Operation in flight
        op: StoreOp,
        /// Backend error
        #[source]
        source: StoreError,
    },
}

impl DirectoryError {
    /// Message shown to the administrator.
    pub fn user_message(&self) -> String {
        match self {
            DirectoryError::StoreUnavailable { .. } => {
                "The client directory is temporarily unavailable. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}
