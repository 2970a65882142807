//! Pipelines: context assembly, prompt rendering, single-shot model
//! invocation and response normalization.

pub mod context_assembler;
pub mod inflight;
pub mod insight_service;
pub mod model_invoker;
pub mod normalizer;
pub mod patterns;
pub mod prompt_builder;
pub mod prompt_catalog;
pub mod recommendation_service;
pub mod template_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use context_assembler::ContextAssembler;
pub use inflight::InflightRegistry;
pub use insight_service::{InsightRequest, InsightService};
pub use model_invoker::ModelInvoker;
pub use recommendation_service::{RecommendationRequest, RecommendationService};
pub use template_service::{TemplateRequest, TemplateService};

use std::sync::Arc;

use crate::domain::models::PipelineConfig;
use crate::domain::ports::{CompletionClient, ProjectStore};

/// The three pipelines wired over one store and one model client.
#[derive(Clone)]
pub struct Advisor {
    pub templates: Arc<TemplateService>,
    pub recommendations: Arc<RecommendationService>,
    pub insights: Arc<InsightService>,
}

impl Advisor {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        completion: Arc<dyn CompletionClient>,
        pipeline: &PipelineConfig,
    ) -> Self {
        let assembler = Arc::new(ContextAssembler::new(store, pipeline.recent_limit));
        let invoker = Arc::new(ModelInvoker::new(completion).with_coalescing(pipeline.coalesce_inflight));
        tracing::debug!(
            recent_limit = pipeline.recent_limit,
            coalescing = invoker.is_coalescing(),
            "pipelines ready"
        );

        Self {
            templates: Arc::new(TemplateService::new(assembler.clone(), invoker.clone())),
            recommendations: Arc::new(RecommendationService::new(assembler.clone(), invoker.clone())),
            insights: Arc::new(InsightService::new(assembler, invoker)),
        }
    }
}
