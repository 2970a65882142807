//! Domain layer for lean-advisor
//!
//! Models, errors and the ports the pipelines depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
