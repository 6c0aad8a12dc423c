//! # Shared Types Crate
//!
//! Domain entities shared by every Filter-Trace subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the unit record, its lifecycle order and the
//!   `REFERENCE|SERIAL` code format are defined here and nowhere else.
//! - **Explicit Actor**: every engine call receives an [`ActorContext`]; there
//!   is no ambient "current user".
//! - **Ledger Text Formats**: stage dates and times are stored as the text the
//!   ledger has always held (`dd/mm/yyyy`, `HH:MM:SS`). Parsing is tolerant,
//!   formatting is canonical.
//!
//! ## Modules
//!
//! ```text
//! shared-types/
//! ├── code.rs      # UnitKey + Code Parser
//! ├── entities.rs  # UnitRecord, UnitState, StageStamp, RecordId
//! ├── actor.rs     # ActorContext, ActorRole
//! ├── client.rs    # ClientName (trimmed, case-insensitive identity)
//! ├── scope.rs     # RecordScope for read paths
//! ├── dates.rs     # Ledger date/time text helpers
//! └── errors.rs    # CodeError, InvalidTransition
//! ```

pub mod actor;
pub mod client;
pub mod code;
pub mod dates;
pub mod entities;
pub mod errors;
pub mod scope;

pub use actor::{normalize_identity, ActorContext, ActorRole};
pub use client::ClientName;
pub use code::{parse_code, UnitKey, CODE_SEPARATOR};
pub use dates::{format_ledger_date, format_ledger_time, parse_ledger_date};
pub use entities::{RecordId, Stage, StageStamp, UnitRecord, UnitState};
pub use errors::{CodeError, InvalidTransition};
pub use scope::RecordScope;
