//! Scripted completion client for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{CompletionClient, CompletionRequest};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Payload(String),
    /// Fail with this message.
    Failure(String),
}

impl MockReply {
    /// Reply with raw text.
    pub fn payload(text: impl Into<String>) -> Self {
        Self::Payload(text.into())
    }

    /// Reply with serialized JSON.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::Payload(value.to_string())
    }

    /// Fail the call.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// Returns queued replies in order, then falls back to the default reply.
pub struct MockCompletionClient {
    queue: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionClient {
    /// Every call answers with an empty JSON object.
    pub fn new() -> Self {
        Self::with_default_reply(MockReply::payload("{}"))
    }

    /// Client that answers with `reply` once the script runs out.
    pub fn with_default_reply(reply: MockReply) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default_reply: reply,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Client that always answers with `value`.
    pub fn always_json(value: &serde_json::Value) -> Self {
        Self::with_default_reply(MockReply::json(value))
    }

    /// Client whose every call fails.
    pub fn always_failing(message: impl Into<String>) -> Self {
        Self::with_default_reply(MockReply::failure(message))
    }

    /// Hold every call for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply for the next unscripted call.
    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(reply);
        }
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }

    fn next_reply(&self) -> MockReply {
        self.queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete_json(&self, request: &CompletionRequest) -> DomainResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply() {
            MockReply::Payload(text) if text.trim().is_empty() => {
                Err(DomainError::ModelFailed("Completion returned an empty payload".to_string()))
            }
            MockReply::Payload(text) => Ok(text),
            MockReply::Failure(message) => Err(DomainError::ModelFailed(message)),
        }
    }
}
