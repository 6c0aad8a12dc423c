//! # Domain Errors

use ft_01_ledger_store::StoreError;
use shared_types::ActorRole;
use thiserror::Error;

/// Projection and reporting error types.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Ledger could not be read.
    #[error("Ledger unavailable during {operation}: {source}")]
    StoreUnavailable {
        /// Read in flight
        operation: &'static str,
        /// Backend error
        #[source]
        source: StoreError,
    },

    /// No client filter was given and the role is not tied to one client.
    #[error("Cannot resolve projection scope for role {role}")]
    ScopeUnresolved {
        /// Caller role
        role: ActorRole,
    },
}

impl ProjectionError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ProjectionError::StoreUnavailable { .. } => {
                "The ledger is temporarily unavailable. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}
