//! # Filter-Trace Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (projection, scan throughput)
//! └── src/integration/  # cross-crate flows
//!     ├── flows.rs      # ledger → lifecycle → projection
//!     └── runtime.rs    # JSON command surface over a file ledger
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ft-tests
//!
//! # Benchmarks
//! cargo bench -p ft-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
