//! Project store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Experiment, Hypothesis, Metric, MvpFeature, PivotOption, Project};

/// Read-only access to persisted project state.
///
/// Every `recent_*` read returns at most `limit` rows ordered newest-first by
/// creation time. There is deliberately no write method: the CRUD layer owns
/// the lifecycle of these rows.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Get a project by ID.
    async fn get_project(&self, project_id: &str) -> DomainResult<Option<Project>>;

    async fn recent_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>>;

    async fn recent_hypotheses(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Hypothesis>>;

    async fn recent_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>>;

    async fn recent_features(&self, project_id: &str, limit: u32) -> DomainResult<Vec<MvpFeature>>;

    async fn recent_pivot_options(&self, project_id: &str, limit: u32) -> DomainResult<Vec<PivotOption>>;

    /// Metrics in error status only.
    async fn problematic_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>>;

    /// Experiments in completed status only.
    async fn completed_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>>;

    /// Get a single experiment belonging to the project.
    async fn get_experiment(&self, project_id: &str, experiment_id: &str) -> DomainResult<Option<Experiment>>;
}
