//! In-memory project store used by the pipeline unit tests.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Experiment, ExperimentStatus, Hypothesis, Metric, MetricStatus, MvpFeature, PivotOption, Project,
};
use crate::domain::ports::ProjectStore;

#[derive(Default)]
pub struct StubStore {
    pub project: Option<Project>,
    pub experiments: Vec<Experiment>,
    pub hypotheses: Vec<Hypothesis>,
    pub metrics: Vec<Metric>,
    pub fail_reads: bool,
    pub call_log: Mutex<Vec<&'static str>>,
}

impl StubStore {
    pub fn with_project() -> Self {
        Self {
            project: Some(project()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.call_log.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> DomainResult<()> {
        self.call_log.lock().unwrap().push(call);
        if self.fail_reads && call != "get_project" {
            return Err(DomainError::DatabaseError(format!("{call} failed")));
        }
        Ok(())
    }
}

fn take<T: Clone>(items: impl Iterator<Item = T>, limit: u32) -> Vec<T> {
    items.take(limit as usize).collect()
}

#[async_trait]
impl ProjectStore for StubStore {
    async fn get_project(&self, project_id: &str) -> DomainResult<Option<Project>> {
        self.record("get_project")?;
        Ok(self.project.clone().filter(|p| p.id == project_id))
    }

    async fn recent_experiments(&self, _project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        self.record("recent_experiments")?;
        Ok(take(self.experiments.iter().cloned(), limit))
    }

    async fn recent_hypotheses(&self, _project_id: &str, limit: u32) -> DomainResult<Vec<Hypothesis>> {
        self.record("recent_hypotheses")?;
        Ok(take(self.hypotheses.iter().cloned(), limit))
    }

    async fn recent_metrics(&self, _project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        self.record("recent_metrics")?;
        Ok(take(self.metrics.iter().cloned(), limit))
    }

    async fn recent_features(&self, _project_id: &str, _limit: u32) -> DomainResult<Vec<MvpFeature>> {
        self.record("recent_features")?;
        Ok(Vec::new())
    }

    async fn recent_pivot_options(&self, _project_id: &str, _limit: u32) -> DomainResult<Vec<PivotOption>> {
        self.record("recent_pivot_options")?;
        Ok(Vec::new())
    }

    async fn problematic_metrics(&self, _project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        self.record("problematic_metrics")?;
        Ok(take(self.metrics.iter().filter(|m| m.status.is_problematic()).cloned(), limit))
    }

    async fn completed_experiments(&self, _project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        self.record("completed_experiments")?;
        Ok(take(self.experiments.iter().filter(|e| e.status.is_completed()).cloned(), limit))
    }

    async fn get_experiment(&self, _project_id: &str, experiment_id: &str) -> DomainResult<Option<Experiment>> {
        self.record("get_experiment")?;
        Ok(self.experiments.iter().find(|e| e.id == experiment_id).cloned())
    }
}

pub fn project() -> Project {
    Project {
        id: "p1".to_string(),
        user_id: "u1".to_string(),
        name: "Ledgerly".to_string(),
        description: Some("Bookkeeping for freelancers".to_string()),
        problem_statement: Some("Freelancers lose hours every month reconciling invoices".to_string()),
        customer_segments: Some("Freelance designers".to_string()),
        stage: Some("problem-validation".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn experiment(id: &str, method: &str, status: ExperimentStatus) -> Experiment {
    Experiment {
        id: id.to_string(),
        project_id: "p1".to_string(),
        title: format!("{method} {id}"),
        hypothesis: Some("Freelancers hate reconciling invoices".to_string()),
        method: Some(method.to_string()),
        status,
        category: Some("problem".to_string()),
        success_criteria: None,
        results: Some("8 of 10 confirmed the pain".to_string()),
        learnings: None,
        created_at: Utc::now() - Duration::days(1),
    }
}

pub fn metric(id: &str, status: MetricStatus) -> Metric {
    Metric {
        id: id.to_string(),
        project_id: "p1".to_string(),
        name: format!("Metric {id}"),
        category: Some("activation".to_string()),
        target: Some(40.0),
        current: Some(12.0),
        unit: Some("%".to_string()),
        status,
        created_at: Utc::now(),
    }
}
