//! # Domain Errors
//!
//! Failures raised by a ledger store or client directory backend.

use shared_types::{RecordId, UnitKey};
use thiserror::Error;

/// Ledger store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend cannot be reached.
    #[error("Ledger backend unavailable: {message}")]
    Unavailable {
        /// Backend detail
        message: String,
    },

    /// Filesystem failure while persisting or loading.
    #[error("Ledger I/O error: {message}")]
    Io {
        /// OS error text
        message: String,
    },

    /// Persisted ledger could not be decoded or encoded.
    #[error("Ledger serialization error: {message}")]
    Serialization {
        /// Decoder detail
        message: String,
    },

    /// A record with this natural key already exists.
    #[error("Duplicate unit key: {key}")]
    DuplicateKey {
        /// Offending key
        key: UnitKey,
    },

    /// No row behind the handle.
    #[error("Ledger row not found: {id}")]
    RowNotFound {
        /// Row handle
        id: RecordId,
    },

    /// Update tried to change the natural key of a row.
    #[error("Row {id} key is immutable: stored {stored}, update carried {attempted}")]
    KeyMismatch {
        /// Row handle
        id: RecordId,
        /// Key on disk
        stored: UnitKey,
        /// Key in the update
        attempted: UnitKey,
    },

    /// Client directory already holds this name.
    #[error("Client already exists: {name}")]
    ClientExists {
        /// Normalized name
        name: String,
    },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}
