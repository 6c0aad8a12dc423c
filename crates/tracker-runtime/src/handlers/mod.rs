//! # Command Handlers
//!
//! Decoding, execution and encoding of stdin commands, and the line server
//! that runs them concurrently.

pub mod commands;
pub mod serve;

pub use commands::{ActorInput, Command, CommandHandler, ErrorBody, Response};
pub use serve::serve;
