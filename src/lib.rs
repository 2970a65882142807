//! Lean Advisor - AI suggestions for lean-startup validation tracking
//!
//! Turns a project's recent experiments, hypotheses, metrics, MVP features and
//! pivot options into model-generated smart templates, experiment
//! recommendations and insights.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the store/model ports
//! - **Service Layer** (`services`): context assembly, prompt rendering, model invocation and normalization
//! - **Adapters** (`adapters`): SQLite and REST stores, the completion client, the HTTP surface
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **Client** (`client`): the consuming-panel side of the HTTP contract
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lean_advisor::adapters::completion::MockCompletionClient;
//! use lean_advisor::services::{Advisor, TemplateRequest};
//!
//! let advisor = Advisor::new(store, Arc::new(MockCompletionClient::new()), &config.pipeline);
//! let envelope = advisor.templates.generate(request).await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ArtifactKind, Config, InsightEnvelope, RecommendationEnvelope, Template, TemplateEnvelope,
};
pub use domain::ports::{CompletionClient, CompletionRequest, ProjectStore};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::Advisor;
