//! HTTP client for the advisor endpoints.
//!
//! Mirrors what the consuming panels do: one POST per fetch, no retry, and
//! the response decoded into the same envelopes the server emits. Template
//! items are decoded per kind on arrival so a panel never renders an
//! unknown shape.

pub mod panel;

pub use panel::{promote_recommendation, promote_template, ArtifactDraft, PanelContent, PanelState};

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::adapters::http::ErrorResponse;
use crate::domain::models::{InsightEnvelope, RecommendationEnvelope, Template, TemplateEnvelope};
use crate::services::{InsightRequest, RecommendationRequest, TemplateRequest};

/// Failure to obtain an envelope from the service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplatesWire {
    #[serde(default)]
    templates: Vec<Value>,
    #[serde(default)]
    suggested_fields: Map<String, Value>,
    #[serde(default)]
    adaptation_reasoning: String,
    #[serde(default)]
    degraded: bool,
}

/// Client for a running advisor service.
#[derive(Debug, Clone)]
pub struct AdvisorClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AdvisorClient {
    /// `base_url` is the mount point, e.g. `https://host/functions/v1`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Send `key` as both the bearer token and the `apikey` header.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Fetch next-experiment recommendations.
    pub async fn recommendations(&self, request: &RecommendationRequest) -> Result<RecommendationEnvelope, ClientError> {
        let body = json!({
            "projectId": request.project_id,
            "userId": request.user_id,
            "currentStage": request.current_stage,
        });
        self.post("experiment-recommendations", &body).await
    }

    /// Fetch insights from completed experiments.
    pub async fn insights(&self, request: &InsightRequest) -> Result<InsightEnvelope, ClientError> {
        let body = json!({
            "projectId": request.project_id,
            "userId": request.user_id,
            "experimentId": request.experiment_id,
        });
        self.post("experiment-insights", &body).await
    }

    /// Fetch smart templates, dropping items that do not decode as `request.kind`.
    pub async fn templates(&self, request: &TemplateRequest) -> Result<TemplateEnvelope, ClientError> {
        let body = json!({
            "projectId": request.project_id,
            "userId": request.user_id,
            "templateType": request.kind,
            "stage": request.stage,
            "context": request.context,
        });
        let wire: TemplatesWire = self.post("smart-templates", &body).await?;

        let received = wire.templates.len();
        let templates: Vec<Template> = wire
            .templates
            .into_iter()
            .filter_map(|item| Template::decode(request.kind, item).ok())
            .collect();
        if templates.len() < received {
            tracing::warn!(
                kind = %request.kind,
                dropped = received - templates.len(),
                "dropped undecodable templates from response"
            );
        }

        Ok(TemplateEnvelope {
            templates,
            suggested_fields: wire.suggested_fields,
            adaptation_reasoning: wire.adaptation_reasoning,
            degraded: wire.degraded,
        })
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<T, ClientError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut builder = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key).header("apikey", key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text).map_or(text, |e| e.error);
            tracing::debug!(%url, status = status.as_u16(), %message, "advisor request rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
