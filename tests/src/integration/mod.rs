//! # Integration Tests
//!
//! Flows that cross crate boundaries.

pub mod flows;
pub mod runtime;
