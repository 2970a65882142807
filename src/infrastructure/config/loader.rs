//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, StoreBackend};

/// Conventional variables of the hosted deployment, mapped onto config keys.
const RAW_ENV_KEYS: [(&str, &str); 3] = [
    ("SUPABASE_URL", "store.url"),
    ("SUPABASE_SERVICE_ROLE_KEY", "store.service_key"),
    ("OPENAI_API_KEY", "model.api_key"),
];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid port: {0}. Must be non-zero")]
    InvalidPort(u16),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid recent_limit: {0}. Must be at least 1")]
    InvalidRecentLimit(u32),

    #[error("Model name cannot be empty")]
    EmptyModelName,

    #[error("store.url is required for the rest backend (set SUPABASE_URL)")]
    MissingStoreUrl,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .lean-advisor/config.yaml
    /// 3. .lean-advisor/local.yaml (optional local overrides)
    /// 4. `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`, `OPENAI_API_KEY`
    /// 5. `LEAN_ADVISOR_*` variables, `__` separating nested keys
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".lean-advisor")
    }

    /// Same layering as [`ConfigLoader::load`] rooted at `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Self::with_env(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Yaml::file(dir.join("local.yaml"))),
        )
        .extract()
        .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Self::with_env(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(path)),
        )
        .extract()
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn with_env(figment: Figment) -> Figment {
        let raw_names: Vec<&str> = RAW_ENV_KEYS.iter().map(|(name, _)| *name).collect();
        figment
            .merge(Env::raw().only(&raw_names).map(|key| {
                RAW_ENV_KEYS
                    .iter()
                    .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                    .map_or_else(|| key.as_str().to_string(), |(_, path)| (*path).to_string())
                    .into()
            }))
            .merge(Env::prefixed("LEAN_ADVISOR_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        if config.store.backend == StoreBackend::Sqlite && config.store.database_path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.store.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.store.max_connections));
        }

        if config.model.model.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }

        if config.pipeline.recent_limit == 0 {
            return Err(ConfigError::InvalidRecentLimit(config.pipeline.recent_limit));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }

    /// Checks that only matter once a store is actually opened.
    pub fn validate_store(config: &Config) -> Result<(), ConfigError> {
        if config.store.backend == StoreBackend::Rest && config.store.url.trim().is_empty() {
            return Err(ConfigError::MissingStoreUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CLEAR_ENV: [(&str, Option<&str>); 5] = [
        ("SUPABASE_URL", None),
        ("SUPABASE_SERVICE_ROLE_KEY", None),
        ("OPENAI_API_KEY", None),
        ("LEAN_ADVISOR_MODEL__MODEL", None),
        ("LEAN_ADVISOR_PIPELINE__RECENT_LIMIT", None),
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.store.backend, StoreBackend::Rest);
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.pipeline.recent_limit, 5);
        assert!(!config.pipeline.coalesce_inflight);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
server:
  port: 9000
store:
  backend: sqlite
  database_path: /tmp/advisor.db
pipeline:
  coalesce_inflight: true
logging:
  level: debug
  format: pretty
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.database_path, "/tmp/advisor.db");
        assert!(config.pipeline.coalesce_inflight);
        assert_eq!(config.logging.format, "pretty");
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidLogFormat(_))));
    }

    #[test]
    fn test_temperature_is_not_configurable() {
        let config: Config = serde_yaml::from_str("model:\n  temperature: 1.9\n  model: gpt-4o\n").unwrap();
        assert_eq!(config.model.model, "gpt-4o");
        let exported = serde_json::to_value(&config.model).unwrap();
        assert!(exported.get("temperature").is_none());
    }

    #[test]
    fn test_validate_zero_recent_limit() {
        let mut config = Config::default();
        config.pipeline.recent_limit = 0;
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidRecentLimit(0))));
    }

    #[test]
    fn test_validate_sqlite_needs_path() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Sqlite;
        config.store.database_path = String::new();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::EmptyDatabasePath)));
    }

    #[test]
    fn test_validate_store_requires_url_for_rest() {
        let config = Config::default();
        assert!(matches!(ConfigLoader::validate_store(&config), Err(ConfigError::MissingStoreUrl)));

        let mut sqlite = Config::default();
        sqlite.store.backend = StoreBackend::Sqlite;
        assert!(ConfigLoader::validate_store(&sqlite).is_ok());
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "model:\n  model: gpt-4o\nlogging:\n  level: info\n  format: json\n")
            .unwrap();
        fs::write(dir.path().join("local.yaml"), "logging:\n  level: debug\n").unwrap();

        let config = temp_env::with_vars(CLEAR_ENV, || ConfigLoader::load_from_dir(dir.path())).unwrap();

        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.logging.level, "debug", "Local override should win");
        assert_eq!(config.logging.format, "json", "Base value should persist");
    }

    #[test]
    fn test_hosted_env_names_are_mapped() {
        let dir = TempDir::new().unwrap();
        let config = temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://example.supabase.co")),
                ("SUPABASE_SERVICE_ROLE_KEY", Some("service-key")),
                ("OPENAI_API_KEY", Some("sk-test")),
                ("LEAN_ADVISOR_MODEL__MODEL", None),
                ("LEAN_ADVISOR_PIPELINE__RECENT_LIMIT", None),
            ],
            || ConfigLoader::load_from_dir(dir.path()),
        )
        .unwrap();

        assert_eq!(config.store.url, "https://example.supabase.co");
        assert_eq!(config.store.service_key, "service-key");
        assert_eq!(config.model.api_key, "sk-test");
    }

    #[test]
    fn test_prefixed_env_overrides_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "pipeline:\n  recent_limit: 3\n").unwrap();

        let config = temp_env::with_vars(
            [
                ("SUPABASE_URL", None),
                ("SUPABASE_SERVICE_ROLE_KEY", None),
                ("OPENAI_API_KEY", None),
                ("LEAN_ADVISOR_MODEL__MODEL", Some("gpt-4.1-mini")),
                ("LEAN_ADVISOR_PIPELINE__RECENT_LIMIT", Some("8")),
            ],
            || ConfigLoader::load_from_dir(dir.path()),
        )
        .unwrap();

        assert_eq!(config.model.model, "gpt-4.1-mini");
        assert_eq!(config.pipeline.recent_limit, 8);
    }
}
