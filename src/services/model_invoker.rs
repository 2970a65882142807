//! Single-shot model invocation shared by every pipeline.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::services::inflight::{request_key, InflightRegistry};
use crate::services::prompt_builder;
use crate::services::prompt_catalog::PromptDescriptor;

/// Renders the prompt and makes at most one upstream call per request.
///
/// With coalescing enabled, concurrent requests for the same project that
/// render to the same upstream request share that call.
pub struct ModelInvoker {
    client: Arc<dyn CompletionClient>,
    inflight: Option<InflightRegistry>,
}

impl ModelInvoker {
    /// Invoker over `client`, coalescing off.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client, inflight: None }
    }

    /// Share identical concurrent calls when `enabled`.
    #[must_use]
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.inflight = enabled.then(InflightRegistry::new);
        self
    }

    /// Whether identical concurrent calls are shared.
    pub fn is_coalescing(&self) -> bool {
        self.inflight.is_some()
    }

    /// Render the prompt for `descriptor` and return the model's raw reply.
    #[tracing::instrument(skip(self, descriptor, context), fields(pipeline = descriptor.name, client = self.client.name()))]
    pub async fn invoke(
        &self,
        descriptor: &PromptDescriptor,
        project_id: &str,
        stage: &str,
        context: &Map<String, Value>,
    ) -> DomainResult<String> {
        let request = prompt_builder::build_request(descriptor, stage, context);

        match &self.inflight {
            Some(registry) => {
                let key = request_key(project_id, &request);
                let client = Arc::clone(&self.client);
                registry.run(key, async move { call(client, request).await }).await
            }
            None => call(Arc::clone(&self.client), request).await,
        }
    }
}

async fn call(client: Arc<dyn CompletionClient>, request: CompletionRequest) -> DomainResult<String> {
    let started = std::time::Instant::now();
    let result = client.complete_json(&request).await;
    tracing::info!(
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        ok = result.is_ok(),
        "model call finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::completion::{MockCompletionClient, MockReply};
    use crate::services::prompt_catalog::METRIC_TEMPLATES;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invoke_passes_temperature_and_prompt() {
        let mock = Arc::new(MockCompletionClient::new());
        let invoker = ModelInvoker::new(mock.clone());

        invoker.invoke(&METRIC_TEMPLATES, "p1", "activation", &Map::new()).await.unwrap();

        let request = mock.last_request().unwrap();
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!(request.prompt.contains("growth metric templates"));
    }

    #[tokio::test]
    async fn test_without_coalescing_each_request_calls_upstream() {
        let mock = Arc::new(MockCompletionClient::new().with_delay(Duration::from_millis(20)));
        let invoker = ModelInvoker::new(mock.clone());
        let context = Map::new();

        let (a, b) = tokio::join!(
            invoker.invoke(&METRIC_TEMPLATES, "p1", "mvp", &context),
            invoker.invoke(&METRIC_TEMPLATES, "p1", "mvp", &context),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_coalescing_shares_one_call() {
        let mock = Arc::new(MockCompletionClient::new().with_delay(Duration::from_millis(20)));
        let invoker = ModelInvoker::new(mock.clone()).with_coalescing(true);
        let context = Map::new();

        let (a, b) = tokio::join!(
            invoker.invoke(&METRIC_TEMPLATES, "p1", "mvp", &context),
            invoker.invoke(&METRIC_TEMPLATES, "p1", "mvp", &context),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_coalescing_keeps_distinct_stages_apart() {
        let mock = Arc::new(MockCompletionClient::new().with_delay(Duration::from_millis(20)));
        let invoker = ModelInvoker::new(mock.clone()).with_coalescing(true);
        let context = json!({"stage": "x", "audience": "agencies"}).as_object().cloned().unwrap();

        let (a, b) = tokio::join!(
            invoker.invoke(&METRIC_TEMPLATES, "p1", "activation", &context),
            invoker.invoke(&METRIC_TEMPLATES, "p1", "retention", &context),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(mock.call_count(), 2);

        let prompts: Vec<String> = mock.requests().into_iter().map(|r| r.prompt).collect();
        assert_ne!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn test_failure_is_returned_not_retried() {
        let mock = Arc::new(MockCompletionClient::with_default_reply(MockReply::failure("503")));
        let invoker = ModelInvoker::new(mock.clone());

        assert!(invoker.invoke(&METRIC_TEMPLATES, "p1", "mvp", &Map::new()).await.is_err());
        assert_eq!(mock.call_count(), 1);
    }
}
