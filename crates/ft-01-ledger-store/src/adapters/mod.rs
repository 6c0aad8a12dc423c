//! # Adapters Layer
//!
//! - `memory` - in-process ledger with fault injection
//! - `file` - JSON snapshot ledger for single-node deployments
//! - `time` - wall clock and settable clock

pub mod file;
pub mod memory;
pub mod time;

pub use file::FileLedger;
pub use memory::InMemoryLedger;
pub use time::{FixedTimeSource, SystemTimeSource};
