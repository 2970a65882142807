//! Pipelines and the panel client against a live server.

mod common;

use serde_json::{json, Map};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use common::{advisor, insert_experiment, seeded_pool, CountingStore, PROJECT_ID, USER_ID};
use lean_advisor::adapters::completion::MockCompletionClient;
use lean_advisor::adapters::http::{AdvisorHttpServer, HttpConfig};
use lean_advisor::client::{promote_template, AdvisorClient, PanelState};
use lean_advisor::domain::models::{ArtifactKind, PipelineConfig, TemplateEnvelope};
use lean_advisor::services::{RecommendationRequest, TemplateRequest};
use lean_advisor::Advisor;

fn template_request(kind: ArtifactKind) -> TemplateRequest {
    TemplateRequest {
        project_id: PROJECT_ID.to_string(),
        user_id: USER_ID.to_string(),
        kind,
        stage: Some("mvp".to_string()),
        context: Map::new(),
    }
}

async fn spawn_server(advisor: Advisor) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = AdvisorHttpServer::new(advisor, HttpConfig::default()).build_router();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/functions/v1")
}

#[tokio::test]
async fn test_identical_requests_are_independent_by_default() {
    let store = CountingStore::over(seeded_pool().await);
    let mock = Arc::new(MockCompletionClient::new().with_delay(Duration::from_millis(50)));
    let advisor = advisor(store, mock.clone());

    let (a, b) = tokio::join!(
        advisor.templates.generate(template_request(ArtifactKind::Hypothesis)),
        advisor.templates.generate(template_request(ArtifactKind::Hypothesis)),
    );

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_coalescing_shares_one_model_call() {
    let store = CountingStore::over(seeded_pool().await);
    let mock = Arc::new(
        MockCompletionClient::always_json(&json!({
            "templates": [{"statement": "Designers lose 3h a week to invoicing", "priority": "high"}]
        }))
        .with_delay(Duration::from_millis(50)),
    );
    let pipeline = PipelineConfig {
        coalesce_inflight: true,
        ..PipelineConfig::default()
    };
    let advisor = Advisor::new(store, mock.clone(), &pipeline);

    let (a, b) = tokio::join!(
        advisor.templates.generate(template_request(ArtifactKind::Hypothesis)),
        advisor.templates.generate(template_request(ArtifactKind::Hypothesis)),
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(mock.call_count(), 1);

    // Resolved calls are not cached.
    advisor.templates.generate(template_request(ArtifactKind::Hypothesis)).await.unwrap();
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_client_renders_populated_and_empty_panels() {
    let pool = seeded_pool().await;
    insert_experiment(&pool, "e1", "interview", "completed", 1).await;
    let mock = Arc::new(MockCompletionClient::always_json(&json!({
        "templates": [
            {"feature": "Invoice export", "priority": "high", "effort": "low"},
            {"feature": "Broken", "priority": "urgent", "effort": "low"}
        ],
        "suggestedFields": {"notes": "Start with CSV"},
        "adaptationReasoning": "Exports unblock the first paying users"
    })));
    let base_url = spawn_server(advisor(CountingStore::over(pool), mock.clone())).await;
    let client = AdvisorClient::new(base_url).unwrap();

    let state = PanelState::from_outcome(client.templates(&template_request(ArtifactKind::MvpFeature)).await);
    let envelope: &TemplateEnvelope = state.content().expect("panel should be populated");
    assert_eq!(envelope.templates.len(), 1);

    let draft = promote_template(&envelope.templates[0], &envelope.suggested_fields);
    assert_eq!(draft.kind, ArtifactKind::MvpFeature);
    assert_eq!(draft.fields["feature"], "Invoice export");
    assert_eq!(draft.fields["notes"], "Start with CSV");

    mock.push_reply(lean_advisor::adapters::completion::MockReply::failure("model down"));
    let request = RecommendationRequest {
        project_id: PROJECT_ID.to_string(),
        user_id: USER_ID.to_string(),
        current_stage: None,
    };
    let state = PanelState::from_outcome(client.recommendations(&request).await);
    assert_eq!(state, PanelState::Empty { degraded: true });
}

#[tokio::test]
async fn test_client_error_panel_does_not_retry() {
    let store = CountingStore::over(seeded_pool().await);
    let base_url = spawn_server(advisor(store.clone(), Arc::new(MockCompletionClient::new()))).await;
    let client = AdvisorClient::new(base_url).unwrap();

    let mut request = template_request(ArtifactKind::Metric);
    request.project_id = "missing".to_string();
    let state = PanelState::from_outcome(client.templates(&request).await);

    assert_eq!(state.error(), Some("HTTP 404: Project not found: missing"));
    assert_eq!(store.reads(), 1);
}
