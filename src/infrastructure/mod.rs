//! Infrastructure layer module
//!
//! Cross-cutting concerns shared by every adapter:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing, secret scrubbing)

pub mod config;
pub mod logging;
