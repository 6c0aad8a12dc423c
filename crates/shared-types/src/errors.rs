//! # Shared Errors
//!
//! Errors produced by the pure helpers in this crate.

use thiserror::Error;

use crate::entities::UnitState;

/// Rejection reasons for a scanned code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The code has no `|` separator.
    #[error("Invalid code format: missing '|' separator in {raw:?}")]
    MissingSeparator {
        /// Raw scanned text
        raw: String,
    },

    /// The code splits into more than two parts.
    #[error("Invalid code format: expected REFERENCE|SERIAL, got {parts} parts in {raw:?}")]
    TooManyParts {
        /// Raw scanned text
        raw: String,
        /// Number of parts found
        parts: usize,
    },

    /// Reference or serial is blank.
    #[error("Invalid code format: empty {field} in {raw:?}")]
    EmptyPart {
        /// Raw scanned text
        raw: String,
        /// Which half was empty
        field: &'static str,
    },
}

/// A lifecycle step other than the single next stage was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid unit transition: {from} -> {to}")]
pub struct InvalidTransition {
    /// Current state
    pub from: UnitState,
    /// Attempted state
    pub to: UnitState,
}
