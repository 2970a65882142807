//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lean_advisor::adapters::completion::MockCompletionClient;
use lean_advisor::adapters::http::{AdvisorHttpServer, HttpConfig};
use lean_advisor::adapters::sqlite::{create_migrated_test_pool, SqliteProjectStore};
use lean_advisor::domain::models::{
    Experiment, Hypothesis, Metric, MvpFeature, PipelineConfig, PivotOption, Project,
};
use lean_advisor::{Advisor, DomainResult, ProjectStore};

pub const PROJECT_ID: &str = "p1";
pub const USER_ID: &str = "u1";

/// Migrated in-memory database holding project `p1` owned by `u1`.
pub async fn seeded_pool() -> SqlitePool {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    sqlx::query(
        "INSERT INTO projects (id, user_id, name, description, problem_statement, customer_segments, stage, created_at)
         VALUES (?, ?, 'Ledgerly', 'Bookkeeping for freelancers', 'Invoicing eats evenings', 'Freelance designers', 'problem-validation', '2024-01-01T00:00:00Z')",
    )
    .bind(PROJECT_ID)
    .bind(USER_ID)
    .execute(&pool)
    .await
    .expect("Failed to seed project");
    pool
}

/// Insert an experiment created `day` days into 2024.
pub async fn insert_experiment(pool: &SqlitePool, id: &str, method: &str, status: &str, day: u32) {
    sqlx::query(
        "INSERT INTO experiments (id, project_id, title, method, status, category, created_at)
         VALUES (?, ?, ?, ?, ?, 'problem', ?)",
    )
    .bind(id)
    .bind(PROJECT_ID)
    .bind(format!("{method} {id}"))
    .bind(method)
    .bind(status)
    .bind(format!("2024-02-{day:02}T09:00:00Z"))
    .execute(pool)
    .await
    .expect("Failed to insert experiment");
}

pub async fn insert_metric(pool: &SqlitePool, id: &str, status: &str, day: u32) {
    sqlx::query(
        "INSERT INTO metrics (id, project_id, name, category, target, current, unit, status, created_at)
         VALUES (?, ?, ?, 'activation', 40, 12, '%', ?, ?)",
    )
    .bind(id)
    .bind(PROJECT_ID)
    .bind(format!("Metric {id}"))
    .bind(status)
    .bind(format!("2024-03-{day:02}T09:00:00Z"))
    .execute(pool)
    .await
    .expect("Failed to insert metric");
}

/// Store wrapper counting every read it forwards.
pub struct CountingStore {
    inner: Arc<dyn ProjectStore>,
    reads: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn ProjectStore>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn over(pool: SqlitePool) -> Arc<Self> {
        Arc::new(Self::new(Arc::new(SqliteProjectStore::new(pool))))
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProjectStore for CountingStore {
    async fn get_project(&self, project_id: &str) -> DomainResult<Option<Project>> {
        self.hit();
        self.inner.get_project(project_id).await
    }

    async fn recent_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        self.hit();
        self.inner.recent_experiments(project_id, limit).await
    }

    async fn recent_hypotheses(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Hypothesis>> {
        self.hit();
        self.inner.recent_hypotheses(project_id, limit).await
    }

    async fn recent_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        self.hit();
        self.inner.recent_metrics(project_id, limit).await
    }

    async fn recent_features(&self, project_id: &str, limit: u32) -> DomainResult<Vec<MvpFeature>> {
        self.hit();
        self.inner.recent_features(project_id, limit).await
    }

    async fn recent_pivot_options(&self, project_id: &str, limit: u32) -> DomainResult<Vec<PivotOption>> {
        self.hit();
        self.inner.recent_pivot_options(project_id, limit).await
    }

    async fn problematic_metrics(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Metric>> {
        self.hit();
        self.inner.problematic_metrics(project_id, limit).await
    }

    async fn completed_experiments(&self, project_id: &str, limit: u32) -> DomainResult<Vec<Experiment>> {
        self.hit();
        self.inner.completed_experiments(project_id, limit).await
    }

    async fn get_experiment(&self, project_id: &str, experiment_id: &str) -> DomainResult<Option<Experiment>> {
        self.hit();
        self.inner.get_experiment(project_id, experiment_id).await
    }
}

pub fn advisor(store: Arc<dyn ProjectStore>, completion: Arc<MockCompletionClient>) -> Advisor {
    Advisor::new(store, completion, &PipelineConfig::default())
}

pub fn router(store: Arc<dyn ProjectStore>, completion: Arc<MockCompletionClient>) -> Router {
    AdvisorHttpServer::new(advisor(store, completion), HttpConfig::default()).build_router()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub async fn read_body(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn read_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("Response is not JSON")
}
