//! # Ports Layer

pub mod inbound;

pub use inbound::{ClientAdminApi, LifecycleApi};
