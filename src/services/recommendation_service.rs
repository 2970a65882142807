//! Experiment-recommendation pipeline.

use serde_json::Map;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::RecommendationEnvelope;
use crate::services::context_assembler::ContextAssembler;
use crate::services::model_invoker::ModelInvoker;
use crate::services::normalizer;
use crate::services::patterns;
use crate::services::prompt_catalog::RECOMMENDATIONS;

/// Input to [`RecommendationService::recommend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    /// Project to recommend for.
    pub project_id: String,
    /// Requesting user; must own the project.
    pub user_id: String,
    /// Falls back to the project's stored stage.
    pub current_stage: Option<String>,
}

/// The experiment-recommendations pipeline.
pub struct RecommendationService {
    assembler: Arc<ContextAssembler>,
    invoker: Arc<ModelInvoker>,
}

impl RecommendationService {
    /// Pipeline over a shared assembler and invoker.
    pub fn new(assembler: Arc<ContextAssembler>, invoker: Arc<ModelInvoker>) -> Self {
        Self { assembler, invoker }
    }

    /// Recommend next experiments for the project's stage.
    ///
    /// The pattern summary comes from the fetched experiments and is present
    /// even when the model step fails.
    #[tracing::instrument(skip(self, request), fields(project_id = %request.project_id))]
    pub async fn recommend(&self, request: RecommendationRequest) -> DomainResult<RecommendationEnvelope> {
        let project = self.assembler.load_project(&request.project_id, &request.user_id).await?;
        let bundle = self
            .assembler
            .assemble(&project, RECOMMENDATIONS.sources, request.current_stage.as_deref(), Map::new())
            .await?;

        let patterns = patterns::summarize(&bundle.recent_experiments);
        let mut context = bundle.to_json();
        if let Some(summary) = &patterns {
            context.insert("patterns".to_string(), serde_json::to_value(summary)?);
        }

        let outcome = match self.invoker.invoke(&RECOMMENDATIONS, &project.id, &bundle.stage, &context).await {
            Ok(raw) => normalizer::normalize_recommendations(&raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(decoded) => {
                tracing::info!(
                    recommendations = decoded.items.len(),
                    dropped = decoded.dropped,
                    "generated recommendations"
                );
                Ok(RecommendationEnvelope {
                    recommendations: decoded.items,
                    patterns,
                    degraded: false,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "recommendation generation failed, returning empty envelope");
                Ok(RecommendationEnvelope {
                    recommendations: Vec::new(),
                    patterns,
                    degraded: true,
                })
            }
        }
    }
}
