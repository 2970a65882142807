//! REST adapters for the hosted project store.

pub mod project_store;

pub use project_store::{RestProjectStore, RestStoreConfig};
