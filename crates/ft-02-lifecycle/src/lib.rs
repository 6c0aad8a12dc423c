//! # FT-02 Lifecycle Engine
//!
//! Per-unit state machine driven by scans.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Lifecycle
//!
//! | From | To | Requires |
//! |------|----|----------|
//! | (absent) | STORED | nothing |
//! | STORED | DISPATCHED | a claimed client |
//! | DISPATCHED | INSTALLED | plate, odometer, installer name |
//! | INSTALLED | UNINSTALLED | odometer |
//! | UNINSTALLED | (terminal) | - |
//!
//! ## Guarantees
//!
//! - At most one in-flight transition per `REFERENCE|SERIAL` (keyed lock table)
//! - Payload-dependent steps never partially apply
//! - Every store call is bounded by `store_timeout_ms`
//! - Client views are written only after the global row
//!
//! ## Module Structure
//!
//! ```text
//! ft-02-lifecycle/
//! ├── domain/     # payloads, outcomes, errors
//! ├── ports/      # LifecycleApi, ClientAdminApi
//! ├── locks.rs    # KeyedLocks, ClientLocks
//! ├── service.rs  # LifecycleService
//! ├── admin.rs    # ClientAdminService
//! └── config.rs   # LifecycleConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod admin;
pub mod config;
pub mod domain;
pub mod locks;
pub mod ports;
pub mod service;

// Re-exports
pub use admin::ClientAdminService;
pub use config::LifecycleConfig;
pub use domain::{
    AdvanceOutcome, AdvanceResult, AdvanceWarning, DirectoryError, InstallData, LifecycleError,
    RequiredData, StoreOp, TransitionPayload, UninstallData,
};
pub use locks::{ClientLocks, KeyedLocks};
pub use ports::{ClientAdminApi, LifecycleApi};
pub use service::{LifecycleDependencies, LifecycleService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
