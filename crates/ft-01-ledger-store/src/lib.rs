//! # FT-01 Ledger Store
//!
//! Persistent home of every unit record and of the client directory.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Model
//!
//! One normalized global table holds every unit. Each client has a view: an
//! index of record ids resolved against the global table at read time. The
//! view index is written separately from the row, which is the only place a
//! global write and its client view can diverge.
//!
//! ## Module Structure
//!
//! ```text
//! ft-01-ledger-store/
//! ├── domain/     # LedgerTables, UnitDraft, ClientEntry, StoreError
//! ├── ports/      # LedgerStore, ClientDirectory, TimeSource
//! └── adapters/   # InMemoryLedger, FileLedger, clocks
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{FileLedger, FixedTimeSource, InMemoryLedger, SystemTimeSource};
pub use domain::{ClientEntry, LedgerTables, StoreError, UnitDraft};
pub use ports::{ClientDirectory, LedgerStore, TimeSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
