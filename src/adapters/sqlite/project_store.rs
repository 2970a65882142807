//! SQLite implementation of the ProjectStore.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Experiment, ExperimentStatus, Hypothesis, Metric, MetricStatus, MvpFeature, PivotOption, Project,
};
use crate::domain::ports::ProjectStore;

/// [`ProjectStore`] over a local SQLite database.
#[derive(Clone)]
pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    /// Store over an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const EXPERIMENT_COLUMNS: &str =
    "id, project_id, title, hypothesis, method, status, category, success_criteria, results, learnings, created_at";
const METRIC_COLUMNS: &str = "id, project_id, name, category, target, current, unit, status, created_at";

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn get_project(&self, project_id: &str) -> DomainResult<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, user_id, name, description, problem_statement, customer_segments, stage, created_at FROM projects WHERE id = ?"
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn recent_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        let rows: Vec<ExperimentRow> = sqlx::query_as(&format!(
            "SELECT {EXPERIMENT_COLUMNS} FROM experiments WHERE project_id = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recent_hypotheses(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Hypothesis>> {
        let rows: Vec<HypothesisRow> = sqlx::query_as(
            "SELECT id, project_id, statement, category, criteria, status, created_at FROM hypotheses WHERE project_id = ? ORDER BY created_at DESC LIMIT ?"
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recent_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(&format!(
            "SELECT {METRIC_COLUMNS} FROM metrics WHERE project_id = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recent_features(&self, project_id: &str, limit: u32) -> DomainResult<Vec<MvpFeature>> {
        let rows: Vec<FeatureRow> = sqlx::query_as(
            "SELECT id, project_id, feature, priority, effort, status, notes, created_at FROM mvp_features WHERE project_id = ? ORDER BY created_at DESC LIMIT ?"
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recent_pivot_options(&self, project_id: &str, limit: u32) -> DomainResult<Vec<PivotOption>> {
        let rows: Vec<PivotRow> = sqlx::query_as(
            "SELECT id, project_id, pivot_type, description, potential_impact, implementation_effort, evidence, created_at FROM pivot_options WHERE project_id = ? ORDER BY created_at DESC LIMIT ?"
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn problematic_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(&format!(
            "SELECT {METRIC_COLUMNS} FROM metrics WHERE project_id = ? AND status = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(project_id)
        .bind(MetricStatus::Error.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn completed_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        let rows: Vec<ExperimentRow> = sqlx::query_as(&format!(
            "SELECT {EXPERIMENT_COLUMNS} FROM experiments WHERE project_id = ? AND status = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(project_id)
        .bind(ExperimentStatus::Completed.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_experiment(&self, project_id: &str, experiment_id: &str) -> DomainResult<Option<Experiment>> {
        let row: Option<ExperimentRow> = sqlx::query_as(&format!(
            "SELECT {EXPERIMENT_COLUMNS} FROM experiments WHERE project_id = ? AND id = ?"
        ))
        .bind(project_id)
        .bind(experiment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    problem_statement: Option<String>,
    customer_segments: Option<String>,
    stage: Option<String>,
    created_at: String,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            problem_statement: row.problem_statement,
            customer_segments: row.customer_segments,
            stage: row.stage,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ExperimentRow {
    id: String,
    project_id: String,
    title: String,
    hypothesis: Option<String>,
    method: Option<String>,
    status: String,
    category: Option<String>,
    success_criteria: Option<String>,
    results: Option<String>,
    learnings: Option<String>,
    created_at: String,
}

impl TryFrom<ExperimentRow> for Experiment {
    type Error = DomainError;

    fn try_from(row: ExperimentRow) -> Result<Self, Self::Error> {
        Ok(Experiment {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            hypothesis: row.hypothesis,
            method: row.method,
            status: ExperimentStatus::from_stored(&row.status),
            category: row.category,
            success_criteria: row.success_criteria,
            results: row.results,
            learnings: row.learnings,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HypothesisRow {
    id: String,
    project_id: String,
    statement: String,
    category: Option<String>,
    criteria: Option<String>,
    status: Option<String>,
    created_at: String,
}

impl TryFrom<HypothesisRow> for Hypothesis {
    type Error = DomainError;

    fn try_from(row: HypothesisRow) -> Result<Self, Self::Error> {
        Ok(Hypothesis {
            id: row.id,
            project_id: row.project_id,
            statement: row.statement,
            category: row.category,
            criteria: row.criteria,
            status: row.status,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MetricRow {
    id: String,
    project_id: String,
    name: String,
    category: Option<String>,
    target: Option<f64>,
    current: Option<f64>,
    unit: Option<String>,
    status: String,
    created_at: String,
}

impl TryFrom<MetricRow> for Metric {
    type Error = DomainError;

    fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
        Ok(Metric {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            category: row.category,
            target: row.target,
            current: row.current,
            unit: row.unit,
            status: MetricStatus::from_str(&row.status).unwrap_or_default(),
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FeatureRow {
    id: String,
    project_id: String,
    feature: String,
    priority: Option<String>,
    effort: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    created_at: String,
}

impl TryFrom<FeatureRow> for MvpFeature {
    type Error = DomainError;

    fn try_from(row: FeatureRow) -> Result<Self, Self::Error> {
        Ok(MvpFeature {
            id: row.id,
            project_id: row.project_id,
            feature: row.feature,
            priority: row.priority,
            effort: row.effort,
            status: row.status,
            notes: row.notes,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PivotRow {
    id: String,
    project_id: String,
    pivot_type: String,
    description: String,
    potential_impact: Option<String>,
    implementation_effort: Option<String>,
    evidence: Option<String>,
    created_at: String,
}

impl TryFrom<PivotRow> for PivotOption {
    type Error = DomainError;

    fn try_from(row: PivotRow) -> Result<Self, Self::Error> {
        Ok(PivotOption {
            id: row.id,
            project_id: row.project_id,
            pivot_type: row.pivot_type,
            description: row.description,
            potential_impact: row.potential_impact,
            implementation_effort: row.implementation_effort,
            evidence: row.evidence,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
