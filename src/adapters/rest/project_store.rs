//! Hosted store adapter over its PostgREST interface.
//!
//! Each port method is one bounded `GET /rest/v1/{table}` with
//! `order=created_at.desc&limit={n}`; filters are PostgREST `eq.` operators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Experiment, ExperimentStatus, Hypothesis, Metric, MetricStatus, MvpFeature, PivotOption, Project,
    StoreConfig,
};
use crate::domain::ports::ProjectStore;
use crate::infrastructure::logging::SecretScrubber;

/// Configuration for the REST store adapter.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Store base URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Service credential sent as `apikey` and bearer token.
    pub service_key: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl From<&StoreConfig> for RestStoreConfig {
    fn from(config: &StoreConfig) -> Self {
        Self {
            base_url: config.url.clone(),
            service_key: config.service_key.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// `ProjectStore` backed by the hosted relational store.
pub struct RestProjectStore {
    config: RestStoreConfig,
    client: Client,
    scrubber: SecretScrubber,
}

impl RestProjectStore {
    /// Build the HTTP client. Fails only if the TLS backend cannot start.
    pub fn new(config: RestStoreConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::DatabaseError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            scrubber: SecretScrubber::new(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url.trim_end_matches('/'), table)
    }

    /// Run one select against `table` with the given PostgREST filters.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        limit: Option<u32>,
    ) -> DomainResult<Vec<T>> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());
        if let Some(limit) = limit {
            query.push(("order", "created_at.desc".to_string()));
            query.push(("limit", limit.to_string()));
        }

        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .header("Accept", "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                DomainError::DatabaseError(self.scrubber.scrub_message(&format!("{table} request failed: {e}")))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::DatabaseError(format!(
                "{table} query returned {status}: {}",
                self.scrubber.scrub_message(&body)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::SerializationError(format!("Failed to decode {table} rows: {e}")))
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl ProjectStore for RestProjectStore {
    async fn get_project(&self, project_id: &str) -> DomainResult<Option<Project>> {
        let rows: Vec<ProjectRow> = self.select("projects", &[("id", eq(project_id))], None).await?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn recent_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        let rows: Vec<ExperimentRow> = self
            .select("experiments", &[("project_id", eq(project_id))], Some(limit))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_hypotheses(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Hypothesis>> {
        let rows: Vec<HypothesisRow> = self
            .select("hypotheses", &[("project_id", eq(project_id))], Some(limit))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        let rows: Vec<MetricRow> = self
            .select("metrics", &[("project_id", eq(project_id))], Some(limit))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_features(&self, project_id: &str, limit: u32) -> DomainResult<Vec<MvpFeature>> {
        let rows: Vec<FeatureRow> = self
            .select("mvp_features", &[("project_id", eq(project_id))], Some(limit))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_pivot_options(&self, project_id: &str, limit: u32) -> DomainResult<Vec<PivotOption>> {
        let rows: Vec<PivotRow> = self
            .select("pivot_options", &[("project_id", eq(project_id))], Some(limit))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn problematic_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        let filters = [
            ("project_id", eq(project_id)),
            ("status", eq(MetricStatus::Error.as_str())),
        ];
        let rows: Vec<MetricRow> = self.select("metrics", &filters, Some(limit)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn completed_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        let filters = [
            ("project_id", eq(project_id)),
            ("status", eq(ExperimentStatus::Completed.as_str())),
        ];
        let rows: Vec<ExperimentRow> = self.select("experiments", &filters, Some(limit)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_experiment(&self, project_id: &str, experiment_id: &str) -> DomainResult<Option<Experiment>> {
        let filters = [("project_id", eq(project_id)), ("id", eq(experiment_id))];
        let rows: Vec<ExperimentRow> = self.select("experiments", &filters, None).await?;
        Ok(rows.into_iter().next().map(Into::into))
    }
}

// -- PostgREST row types (snake_case columns) --

#[derive(Debug, Deserialize)]
struct ProjectRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    problem_statement: Option<String>,
    customer_segments: Option<String>,
    stage: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            problem_statement: row.problem_statement,
            customer_segments: row.customer_segments,
            stage: row.stage,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExperimentRow {
    id: String,
    project_id: String,
    title: String,
    hypothesis: Option<String>,
    method: Option<String>,
    #[serde(default)]
    status: Option<String>,
    category: Option<String>,
    success_criteria: Option<String>,
    results: Option<String>,
    learnings: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ExperimentRow> for Experiment {
    fn from(row: ExperimentRow) -> Self {
        Experiment {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            hypothesis: row.hypothesis,
            method: row.method,
            status: row.status.as_deref().map(ExperimentStatus::from_stored).unwrap_or_default(),
            category: row.category,
            success_criteria: row.success_criteria,
            results: row.results,
            learnings: row.learnings,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HypothesisRow {
    id: String,
    project_id: String,
    statement: String,
    category: Option<String>,
    criteria: Option<String>,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<HypothesisRow> for Hypothesis {
    fn from(row: HypothesisRow) -> Self {
        Hypothesis {
            id: row.id,
            project_id: row.project_id,
            statement: row.statement,
            category: row.category,
            criteria: row.criteria,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetricRow {
    id: String,
    project_id: String,
    name: String,
    category: Option<String>,
    target: Option<f64>,
    current: Option<f64>,
    unit: Option<String>,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MetricRow> for Metric {
    fn from(row: MetricRow) -> Self {
        Metric {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            category: row.category,
            target: row.target,
            current: row.current,
            unit: row.unit,
            status: row.status.as_deref().and_then(MetricStatus::from_str).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureRow {
    id: String,
    project_id: String,
    feature: String,
    priority: Option<String>,
    effort: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FeatureRow> for MvpFeature {
    fn from(row: FeatureRow) -> Self {
        MvpFeature {
            id: row.id,
            project_id: row.project_id,
            feature: row.feature,
            priority: row.priority,
            effort: row.effort,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PivotRow {
    id: String,
    project_id: String,
    pivot_type: String,
    description: String,
    potential_impact: Option<String>,
    implementation_effort: Option<String>,
    evidence: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PivotRow> for PivotOption {
    fn from(row: PivotRow) -> Self {
        PivotOption {
            id: row.id,
            project_id: row.project_id,
            pivot_type: row.pivot_type,
            description: row.description,
            potential_impact: row.potential_impact,
            implementation_effort: row.implementation_effort,
            evidence: row.evidence,
            created_at: row.created_at,
        }
    }
}
