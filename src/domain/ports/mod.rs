//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters must implement:
//! - ProjectStore: read-only access to project records
//! - CompletionClient: the text-generation model
//!
//! Services receive both as `Arc<dyn ...>` so tests can swap in fakes.

pub mod completion_client;
pub mod project_store;

pub use completion_client::{CompletionClient, CompletionRequest};
pub use project_store::ProjectStore;
