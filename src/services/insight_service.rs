//! Insight pipeline over completed experiments.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::InsightEnvelope;
use crate::services::context_assembler::ContextAssembler;
use crate::services::model_invoker::ModelInvoker;
use crate::services::normalizer;
use crate::services::prompt_catalog::INSIGHTS;

/// Input to [`InsightService::analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRequest {
    /// Project to analyze.
    pub project_id: String,
    /// Requesting user; must own the project.
    pub user_id: String,
    /// Centre the analysis on one experiment.
    pub experiment_id: Option<String>,
}

/// The experiment-insights pipeline.
pub struct InsightService {
    assembler: Arc<ContextAssembler>,
    invoker: Arc<ModelInvoker>,
}

impl InsightService {
    /// Pipeline over a shared assembler and invoker.
    pub fn new(assembler: Arc<ContextAssembler>, invoker: Arc<ModelInvoker>) -> Self {
        Self { assembler, invoker }
    }

    /// Distil insights from the project's completed experiments.
    ///
    /// Without completed experiments the model is not called and the envelope
    /// carries the "No completed experiments found" error.
    #[tracing::instrument(skip(self, request), fields(project_id = %request.project_id))]
    pub async fn analyze(&self, request: InsightRequest) -> DomainResult<InsightEnvelope> {
        let project = self.assembler.load_project(&request.project_id, &request.user_id).await?;

        let mut overrides = Map::new();
        if let Some(experiment_id) = request.experiment_id.as_deref() {
            let focus = self
                .assembler
                .store()
                .get_experiment(&project.id, experiment_id)
                .await?
                .ok_or_else(|| DomainError::ExperimentNotFound(experiment_id.to_string()))?;
            overrides.insert("focusExperiment".to_string(), serde_json::to_value(focus)?);
        }

        let bundle = self.assembler.assemble(&project, INSIGHTS.sources, None, overrides).await?;
        if bundle.recent_experiments.is_empty() {
            tracing::info!("no completed experiments, skipping model call");
            return Ok(InsightEnvelope::no_completed_experiments());
        }
        let context = bundle.to_json();
        tracing::debug!(experiments = ?experiment_ids(&context), "analyzing completed experiments");

        let outcome = match self.invoker.invoke(&INSIGHTS, &project.id, &bundle.stage, &context).await {
            Ok(raw) => normalizer::normalize_insights(&raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(decoded) => {
                tracing::info!(insights = decoded.items.len(), dropped = decoded.dropped, "generated insights");
                Ok(InsightEnvelope {
                    insights: decoded.items,
                    error: None,
                    degraded: false,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "insight generation failed, returning empty envelope");
                Ok(InsightEnvelope {
                    insights: Vec::new(),
                    error: None,
                    degraded: true,
                })
            }
        }
    }
}

/// Ids of the experiments in a rendered context.
pub fn experiment_ids(context: &Map<String, Value>) -> Vec<String> {
    context
        .get("recentExperiments")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|e| e.get("id").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::completion::MockCompletionClient;
    use crate::domain::models::ExperimentStatus;
    use crate::services::test_support::{experiment, StubStore};
    use serde_json::json;

    fn service(store: Arc<StubStore>, mock: Arc<MockCompletionClient>) -> InsightService {
        InsightService::new(
            Arc::new(ContextAssembler::new(store, 5)),
            Arc::new(ModelInvoker::new(mock)),
        )
    }

    fn request(experiment_id: Option<&str>) -> InsightRequest {
        InsightRequest {
            project_id: "p1".to_string(),
            user_id: "u1".to_string(),
            experiment_id: experiment_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_no_completed_experiments() {
        let store = Arc::new(StubStore {
            experiments: vec![experiment("e1", "interview", ExperimentStatus::InProgress)],
            ..StubStore::with_project()
        });
        let mock = Arc::new(MockCompletionClient::new());

        let envelope = service(store, mock.clone()).analyze(request(None)).await.unwrap();

        assert_eq!(envelope.error.as_deref(), Some("No completed experiments found"));
        assert!(envelope.insights.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_insights_from_completed_experiments() {
        let store = Arc::new(StubStore {
            experiments: vec![
                experiment("e1", "interview", ExperimentStatus::Completed),
                experiment("e2", "survey", ExperimentStatus::Planned),
            ],
            ..StubStore::with_project()
        });
        let mock = Arc::new(MockCompletionClient::always_json(&json!({
            "insights": [
                {"title": "Pain is real", "description": "8 of 10 confirmed", "category": "customer",
                 "confidence": 80, "actionItems": ["Build invoice import"], "relatedExperiments": ["e1"],
                 "tags": ["problem"]},
                {"title": "", "description": "dropped", "confidence": 50}
            ]
        })));

        let envelope = service(store, mock.clone()).analyze(request(None)).await.unwrap();

        assert_eq!(envelope.insights.len(), 1);
        assert!(!envelope.insights[0].id.is_empty());
        assert!(envelope.error.is_none());
        let prompt = mock.last_request().unwrap().prompt;
        assert!(prompt.contains("interview e1"));
        assert!(!prompt.contains("survey e2"));
    }

    #[tokio::test]
    async fn test_focus_experiment_in_context() {
        let store = Arc::new(StubStore {
            experiments: vec![experiment("e1", "interview", ExperimentStatus::Completed)],
            ..StubStore::with_project()
        });
        let mock = Arc::new(MockCompletionClient::new());

        service(store.clone(), mock.clone()).analyze(request(Some("e1"))).await.unwrap();

        assert!(mock.last_request().unwrap().prompt.contains("\"focusExperiment\""));
        assert_eq!(store.calls(), vec!["get_project", "get_experiment", "completed_experiments"]);
    }

    #[tokio::test]
    async fn test_unknown_focus_experiment() {
        let store = Arc::new(StubStore::with_project());
        let err = service(store, Arc::new(MockCompletionClient::new()))
            .analyze(request(Some("missing")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ExperimentNotFound(_)));
    }

    #[tokio::test]
    async fn test_model_failure_is_soft() {
        let store = Arc::new(StubStore {
            experiments: vec![experiment("e1", "interview", ExperimentStatus::Completed)],
            ..StubStore::with_project()
        });
        let envelope = service(store, Arc::new(MockCompletionClient::always_failing("boom")))
            .analyze(request(None))
            .await
            .unwrap();

        assert!(envelope.insights.is_empty());
        assert!(envelope.degraded);
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_experiment_ids() {
        let context = json!({"recentExperiments": [{"id": "e1"}, {"id": "e2"}]});
        assert_eq!(experiment_ids(context.as_object().unwrap()), vec!["e1", "e2"]);
    }
}
