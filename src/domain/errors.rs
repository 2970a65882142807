//! Domain errors for the lean-advisor pipelines.

use thiserror::Error;

/// Domain-level errors that can occur while generating suggestions.
///
/// Cloneable so a coalesced in-flight result can be handed to every waiter.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Model invocation failed: {0}")]
    ModelFailed(String),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether this error originates from reading the store.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::SerializationError(_))
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
