//! OpenAI chat-completions adapter.
//!
//! Requests a single JSON-object completion from `/chat/completions`.
//! Compatible with any OpenAI-compatible endpoint. No retries: one request
//! per call, whatever happens.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ModelConfig;
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::infrastructure::logging::SecretScrubber;

/// Configuration for the OpenAI completion client.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionConfig {
    /// API key; may be empty, in which case every call fails upstream.
    pub api_key: String,
    /// Base URL for the API. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Request timeout; `None` keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiCompletionConfig {
    fn default() -> Self {
        let model = ModelConfig::default();
        Self {
            api_key: model.api_key,
            base_url: model.base_url,
            model: model.model,
            timeout_secs: model.timeout_secs,
        }
    }
}

impl From<&ModelConfig> for OpenAiCompletionConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// [`CompletionClient`] over the chat-completions API.
pub struct OpenAiCompletionClient {
    config: OpenAiCompletionConfig,
    client: Client,
    scrubber: SecretScrubber,
}

impl OpenAiCompletionClient {
    /// Build the HTTP client. Fails only if the TLS backend cannot start.
    pub fn new(config: OpenAiCompletionConfig) -> DomainResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::ModelFailed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            scrubber: SecretScrubber::new(),
        })
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
            temperature: request.temperature,
            response_format: ResponseFormat { format_type: "json_object" },
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[tracing::instrument(skip_all, fields(model = %self.config.model))]
    async fn complete_json(&self, request: &CompletionRequest) -> DomainResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| {
                DomainError::ModelFailed(self.scrubber.scrub_message(&format!("Completion request failed: {e}")))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(DomainError::ModelFailed(format!(
                "Completion API returned {status}: {}",
                self.scrubber.scrub_message(&body)
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ModelFailed(format!("Failed to parse completion response: {e}")))?;

        if let Some(usage) = &result.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| DomainError::ModelFailed("Completion returned an empty payload".to_string()))
    }
}

// -- Chat completions request/response types --

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
