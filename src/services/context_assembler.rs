//! Builds the per-request context bundle from the project store.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ContextBundle, Project};
use crate::domain::ports::ProjectStore;
use crate::services::prompt_catalog::ContextSource;

/// Reads a bounded, newest-first window of each relevant collection.
///
/// Reads run one after another; the first failure aborts the request with no
/// partial bundle.
pub struct ContextAssembler {
    store: Arc<dyn ProjectStore>,
    limit: u32,
}

impl ContextAssembler {
    /// Assembler reading at most `limit` rows per collection.
    pub fn new(store: Arc<dyn ProjectStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    /// Resolve the project, treating a project owned by another user as missing.
    pub async fn load_project(&self, project_id: &str, user_id: &str) -> DomainResult<Project> {
        match self.store.get_project(project_id).await? {
            Some(project) if project.is_owned_by(user_id) => Ok(project),
            Some(_) => {
                tracing::warn!(project_id, user_id, "project requested by a user who does not own it");
                Err(DomainError::ProjectNotFound(project_id.to_string()))
            }
            None => Err(DomainError::ProjectNotFound(project_id.to_string())),
        }
    }

    /// Read each of `sources` for `project` and build the bundle.
    #[tracing::instrument(skip(self, project, overrides), fields(project_id = %project.id))]
    pub async fn assemble(
        &self,
        project: &Project,
        sources: &[ContextSource],
        stage: Option<&str>,
        overrides: Map<String, Value>,
    ) -> DomainResult<ContextBundle> {
        let mut bundle = ContextBundle::for_project(project, stage).with_overrides(overrides);
        let id = project.id.as_str();

        for source in sources {
            match source {
                ContextSource::Experiments => {
                    bundle.recent_experiments = self.store.recent_experiments(id, self.limit).await?;
                }
                ContextSource::CompletedExperiments => {
                    bundle.recent_experiments = self.store.completed_experiments(id, self.limit).await?;
                }
                ContextSource::Hypotheses => {
                    bundle.recent_hypotheses = self.store.recent_hypotheses(id, self.limit).await?;
                }
                ContextSource::Metrics => {
                    bundle.recent_metrics = self.store.recent_metrics(id, self.limit).await?;
                }
                ContextSource::ProblematicMetrics => {
                    bundle.problematic_metrics = self.store.problematic_metrics(id, self.limit).await?;
                }
                ContextSource::Features => {
                    bundle.recent_features = self.store.recent_features(id, self.limit).await?;
                }
                ContextSource::PivotOptions => {
                    bundle.recent_pivot_options = self.store.recent_pivot_options(id, self.limit).await?;
                }
            }
        }

        tracing::debug!(
            experiments = bundle.recent_experiments.len(),
            hypotheses = bundle.recent_hypotheses.len(),
            metrics = bundle.recent_metrics.len(),
            features = bundle.recent_features.len(),
            pivot_options = bundle.recent_pivot_options.len(),
            problematic_metrics = bundle.problematic_metrics.len(),
            "assembled context"
        );
        Ok(bundle)
    }
}
