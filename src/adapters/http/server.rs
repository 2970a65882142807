//! Advisor HTTP server.
//!
//! Exposes the three pipelines as JSON POST endpoints, at the root and
//! under `/functions/v1/`, with permissive CORS for browser callers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use crate::domain::models::{
    ArtifactKind, InsightEnvelope, RecommendationEnvelope, ServerConfig, TemplateEnvelope,
};
use crate::services::{Advisor, InsightRequest, RecommendationRequest, TemplateRequest};

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Attach the permissive CORS layer.
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        ServerConfig::default().into()
    }
}

impl From<ServerConfig> for HttpConfig {
    fn from(config: ServerConfig) -> Self {
        Self {
            host: config.host,
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

/// Path prefixes every endpoint is mounted under.
const MOUNTS: [&str; 2] = ["", "/functions/v1"];

/// `experiment-recommendations` request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsBody {
    /// Required.
    pub project_id: Option<String>,
    /// Required.
    pub user_id: Option<String>,
    /// Overrides the project's stage.
    pub current_stage: Option<String>,
}

/// `experiment-insights` request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsBody {
    /// Required.
    pub project_id: Option<String>,
    /// Required.
    pub user_id: Option<String>,
    /// Focus on one experiment.
    pub experiment_id: Option<String>,
}

/// `smart-templates` request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartTemplatesBody {
    /// Required.
    pub project_id: Option<String>,
    /// Required.
    pub user_id: Option<String>,
    /// Required; one of the artifact kind names.
    pub template_type: Option<String>,
    /// Overrides the project's stage.
    pub stage: Option<String>,
    /// Object merged over the fetched context.
    pub context: Option<Value>,
}

impl RecommendationsBody {
    fn into_request(self) -> Result<RecommendationRequest, ApiError> {
        let [project_id, user_id] = require([("projectId", self.project_id), ("userId", self.user_id)])?;
        Ok(RecommendationRequest {
            project_id,
            user_id,
            current_stage: non_blank(self.current_stage),
        })
    }
}

impl InsightsBody {
    fn into_request(self) -> Result<InsightRequest, ApiError> {
        let [project_id, user_id] = require([("projectId", self.project_id), ("userId", self.user_id)])?;
        Ok(InsightRequest {
            project_id,
            user_id,
            experiment_id: non_blank(self.experiment_id),
        })
    }
}

impl SmartTemplatesBody {
    fn into_request(self) -> Result<TemplateRequest, ApiError> {
        let [project_id, user_id, template_type] = require([
            ("projectId", self.project_id),
            ("userId", self.user_id),
            ("templateType", self.template_type),
        ])?;

        let kind = ArtifactKind::from_str(&template_type).ok_or_else(|| {
            let valid: Vec<&str> = ArtifactKind::ALL.iter().map(ArtifactKind::as_str).collect();
            ApiError::BadRequest(format!(
                "Invalid templateType '{template_type}'. Must be one of: {}",
                valid.join(", ")
            ))
        })?;

        let context = match self.context {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ApiError::BadRequest("context must be a JSON object".to_string())),
        };

        Ok(TemplateRequest {
            project_id,
            user_id,
            kind,
            stage: non_blank(self.stage),
            context,
        })
    }
}

/// Unwrap required string fields, naming every missing or blank one.
fn require<const N: usize>(fields: [(&str, Option<String>); N]) -> Result<[String; N], ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!("Missing required fields: {}", missing.join(", "))));
    }
    Ok(fields.map(|(_, value)| value.unwrap_or_default()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

struct AppState {
    advisor: Advisor,
}

/// HTTP front end for an [`Advisor`].
pub struct AdvisorHttpServer {
    config: HttpConfig,
    advisor: Advisor,
}

impl AdvisorHttpServer {
    /// Server for `advisor` with the given bind settings.
    pub fn new(advisor: Advisor, config: HttpConfig) -> Self {
        Self { config, advisor }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        let state = Arc::new(AppState {
            advisor: self.advisor.clone(),
        });

        let mut app = Router::new().route("/health", get(health_check));
        for mount in MOUNTS {
            app = app
                .route(
                    &format!("{mount}/experiment-recommendations"),
                    post(experiment_recommendations).options(preflight),
                )
                .route(
                    &format!("{mount}/experiment-insights"),
                    post(experiment_insights).options(preflight),
                )
                .route(&format!("{mount}/smart-templates"), post(smart_templates).options(preflight));
        }
        let app = app.with_state(state);

        if self.config.enable_cors {
            app.layer(cors_layer()).layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!(%addr, "advisor HTTP server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
        Ok(())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

/// Bare OPTIONS requests that are not CORS preflights.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn experiment_recommendations(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RecommendationsBody>, JsonRejection>,
) -> Result<Json<RecommendationEnvelope>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    Ok(Json(state.advisor.recommendations.recommend(request).await?))
}

async fn experiment_insights(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InsightsBody>, JsonRejection>,
) -> Result<Json<InsightEnvelope>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    Ok(Json(state.advisor.insights.analyze(request).await?))
}

async fn smart_templates(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SmartTemplatesBody>, JsonRejection>,
) -> Result<Json<TemplateEnvelope>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    Ok(Json(state.advisor.templates.generate(request).await?))
}
