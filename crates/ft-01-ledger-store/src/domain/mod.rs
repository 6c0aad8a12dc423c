//! # Domain Module
//!
//! Ledger rows, table logic and store errors.

pub mod entities;
pub mod errors;
pub mod tables;

pub use entities::*;
pub use errors::*;
pub use tables::LedgerTables;
