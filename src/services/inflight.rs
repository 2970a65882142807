//! Optional coalescing of identical in-flight model calls.
//!
//! Concurrent requests with the same key await one shared upstream call.
//! The entry is removed as soon as that call resolves, so nothing is cached
//! across requests.

use futures::future::{BoxFuture, FutureExt, Shared};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::domain::errors::DomainResult;
use crate::domain::ports::CompletionRequest;

type SharedCall = Shared<BoxFuture<'static, DomainResult<String>>>;

/// Key for a request: sha256 over the project id and everything sent upstream.
///
/// Two requests share a key only when the model would see identical input.
pub fn request_key(project_id: &str, request: &CompletionRequest) -> String {
    let mut hasher = Sha256::new();
    for part in [project_id, request.system.as_str(), request.prompt.as_str()] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(request.temperature.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// Calls currently in flight, keyed by [`request_key`].
#[derive(Default)]
pub struct InflightRegistry {
    calls: Mutex<HashMap<String, (u64, SharedCall)>>,
    next_id: AtomicU64,
}

impl InflightRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `call` unless an identical call is already in flight, in which
    /// case wait for that one instead.
    pub async fn run<F>(&self, key: String, call: F) -> DomainResult<String>
    where
        F: Future<Output = DomainResult<String>> + Send + 'static,
    {
        let (id, shared) = {
            let mut calls = self.calls.lock().await;
            if let Some((id, existing)) = calls.get(&key) {
                tracing::debug!(key = %key, "joining in-flight model call");
                (*id, existing.clone())
            } else {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let shared = call.boxed().shared();
                calls.insert(key.clone(), (id, shared.clone()));
                (id, shared)
            }
        };

        let result = shared.await;

        let mut calls = self.calls.lock().await;
        if calls.get(&key).is_some_and(|(current, _)| *current == id) {
            calls.remove(&key);
        }
        result
    }

    /// Number of distinct calls still awaiting a result.
    pub async fn in_flight(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_key_depends_on_every_part() {
        let request = CompletionRequest::new("system", "prompt", 0.7);
        let key = request_key("p1", &request);
        assert_eq!(key.len(), 64);
        assert_eq!(key, request_key("p1", &CompletionRequest::new("system", "prompt", 0.7)));
        assert_ne!(key, request_key("p2", &request));
        assert_ne!(key, request_key("p1", &CompletionRequest::new("other", "prompt", 0.7)));
        assert_ne!(key, request_key("p1", &CompletionRequest::new("system", "prompt!", 0.7)));
        assert_ne!(key, request_key("p1", &CompletionRequest::new("system", "prompt", 0.2)));
        // Part boundaries are delimited
        assert_ne!(
            request_key("p1", &CompletionRequest::new("ab", "c", 0.7)),
            request_key("p1", &CompletionRequest::new("a", "bc", 0.7))
        );
    }

    #[tokio::test]
    async fn test_concurrent_identical_calls_share_one_upstream_call() {
        let registry = Arc::new(InflightRegistry::new());
        let upstream = Arc::new(AtomicUsize::new(0));

        let make_call = |upstream: Arc<AtomicUsize>| async move {
            upstream.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, crate::domain::DomainError>("{\"templates\": []}".to_string())
        };

        let (a, b) = tokio::join!(
            registry.run("k".to_string(), make_call(upstream.clone())),
            registry.run("k".to_string(), make_call(upstream.clone())),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(upstream.load(Ordering::SeqCst), 1);
        assert_eq!(registry.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_results_are_not_cached_after_completion() {
        let registry = InflightRegistry::new();
        let upstream = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = upstream.clone();
            registry
                .run("k".to_string(), async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("{}".to_string())
                })
                .await
                .unwrap();
        }
        assert_eq!(upstream.load(Ordering::SeqCst), 2);
    }
}
