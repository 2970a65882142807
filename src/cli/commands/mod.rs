//! CLI command implementations.

pub mod migrate;
pub mod pipeline;
pub mod serve;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::completion::{MockCompletionClient, OpenAiCompletionClient, OpenAiCompletionConfig};
use crate::adapters::rest::{RestProjectStore, RestStoreConfig};
use crate::adapters::sqlite::{database_url, initialize_database, PoolConfig, SqliteProjectStore};
use crate::domain::models::{Config, StoreBackend};
use crate::domain::ports::{CompletionClient, ProjectStore};
use crate::infrastructure::config::ConfigLoader;
use crate::services::Advisor;

/// Open the configured project store.
pub async fn build_store(config: &Config) -> Result<Arc<dyn ProjectStore>> {
    match config.store.backend {
        StoreBackend::Sqlite => {
            let pool_config = PoolConfig {
                max_connections: config.store.max_connections,
                ..PoolConfig::default()
            };
            let pool = initialize_database(&database_url(&config.store.database_path), Some(pool_config))
                .await
                .with_context(|| format!("Failed to open database at {}", config.store.database_path))?;
            Ok(Arc::new(SqliteProjectStore::new(pool)))
        }
        StoreBackend::Rest => {
            ConfigLoader::validate_store(config)?;
            let store = RestProjectStore::new(RestStoreConfig::from(&config.store))
                .context("Failed to create REST store client")?;
            Ok(Arc::new(store))
        }
    }
}

/// The model client; `offline` swaps in a stub that always answers `{}`.
pub fn build_completion(config: &Config, offline: bool) -> Result<Arc<dyn CompletionClient>> {
    if offline {
        tracing::warn!("offline mode: model calls return empty output");
        return Ok(Arc::new(MockCompletionClient::new()));
    }
    let client = OpenAiCompletionClient::new(OpenAiCompletionConfig::from(&config.model))
        .context("Failed to create completion client")?;
    Ok(Arc::new(client))
}

/// Store, model client and pipelines for one process.
pub async fn build_advisor(config: &Config, offline: bool) -> Result<Advisor> {
    let store = build_store(config).await?;
    let completion = build_completion(config, offline)?;
    tracing::info!(
        backend = ?config.store.backend,
        model = %config.model.model,
        completion = completion.name(),
        "advisor wired"
    );
    Ok(Advisor::new(store, completion, &config.pipeline))
}
