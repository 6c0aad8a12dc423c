//! # Ports Layer
//!
//! Driven ports for the ledger backend, the client directory and the clock.

pub mod outbound;

pub use outbound::{ClientDirectory, LedgerStore, TimeSource};
