//! HTTP surface for the advisor pipelines.

pub mod error;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{AdvisorHttpServer, HttpConfig};
