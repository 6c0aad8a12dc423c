//! # Domain Module
//!
//! Payloads, outcomes and errors of the lifecycle engine.

pub mod errors;
pub mod outcome;
pub mod payload;

pub use errors::*;
pub use outcome::*;
pub use payload::*;
