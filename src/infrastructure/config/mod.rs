//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment: defaults, project YAML files,
//! then environment variables.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
