//! Smart-template pipeline: assemble, prompt, invoke once, normalize.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ArtifactKind, TemplateEnvelope};
use crate::services::context_assembler::ContextAssembler;
use crate::services::model_invoker::ModelInvoker;
use crate::services::normalizer;
use crate::services::prompt_catalog::template_descriptor;

/// Input to [`TemplateService::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRequest {
    /// Project to tailor for.
    pub project_id: String,
    /// Requesting user; must own the project.
    pub user_id: String,
    /// Artifact kind to generate.
    pub kind: ArtifactKind,
    /// Falls back to the project's stored stage.
    pub stage: Option<String>,
    /// Caller hints merged over the fetched context.
    pub context: Map<String, Value>,
}

/// The smart-templates pipeline.
pub struct TemplateService {
    assembler: Arc<ContextAssembler>,
    invoker: Arc<ModelInvoker>,
}

impl TemplateService {
    /// Pipeline over a shared assembler and invoker.
    pub fn new(assembler: Arc<ContextAssembler>, invoker: Arc<ModelInvoker>) -> Self {
        Self { assembler, invoker }
    }

    /// Generate templates for one artifact kind.
    ///
    /// Store failures propagate. Model failures yield a degraded empty envelope.
    #[tracing::instrument(skip(self, request), fields(project_id = %request.project_id, kind = %request.kind))]
    pub async fn generate(&self, request: TemplateRequest) -> DomainResult<TemplateEnvelope> {
        let project = self.assembler.load_project(&request.project_id, &request.user_id).await?;
        let descriptor = template_descriptor(request.kind);

        let bundle = self
            .assembler
            .assemble(&project, descriptor.sources, request.stage.as_deref(), request.context)
            .await?;
        let context = bundle.to_json();

        let outcome = match self.invoker.invoke(descriptor, &project.id, &bundle.stage, &context).await {
            Ok(raw) => normalizer::normalize_templates(request.kind, &raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(envelope) => {
                tracing::info!(templates = envelope.templates.len(), "generated templates");
                Ok(envelope)
            }
            Err(e) => {
                tracing::error!(error = %e, "template generation failed, returning empty envelope");
                Ok(TemplateEnvelope::degraded())
            }
        }
    }
}
