//! # Domain Module

pub mod entities;
pub mod errors;
pub mod scope;

pub use entities::*;
pub use errors::*;
pub use scope::resolve_projection_filter;
