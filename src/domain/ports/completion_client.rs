//! Completion client port
//!
//! The text-generation model is the only non-deterministic boundary in the
//! crate. Pipelines talk to it through this trait so tests can substitute a
//! scripted stub.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// A single JSON-object completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message framing the model's role
    pub system: String,
    /// Rendered instruction containing the serialized context
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Request with the given parts.
    pub fn new(system: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// A language model that answers with one JSON object.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Adapter name used in logs.
    fn name(&self) -> &'static str;

    /// Obtain exactly one completion and return its raw JSON text.
    ///
    /// An empty payload is an error. Implementations must not retry.
    async fn complete_json(&self, request: &CompletionRequest) -> DomainResult<String>;
}
