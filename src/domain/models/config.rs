//! Configuration tree loaded by the figment layer in `infrastructure::config`.

use serde::{Deserialize, Serialize};

/// Main configuration structure for lean-advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Project store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Language-model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to attach the permissive CORS layer
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8787
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

/// Which store adapter serves project reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local `SQLite` database file
    Sqlite,
    /// Hosted store's REST interface
    #[default]
    Rest,
}

/// Project store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Which store implementation to open.
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base URL of the hosted store (`SUPABASE_URL`)
    #[serde(default)]
    pub url: String,

    /// Service credential for the hosted store (`SUPABASE_SERVICE_ROLE_KEY`)
    #[serde(default)]
    pub service_key: String,

    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout for REST store requests
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database_path() -> String {
    ".lean-advisor/lean-advisor.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_store_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            service_key: String::new(),
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            timeout_secs: default_store_timeout_secs(),
        }
    }
}

/// Language-model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    /// API key (`OPENAI_API_KEY`); empty is tolerated until the first call
    #[serde(default)]
    pub api_key: String,

    /// Chat-completions endpoint root.
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model name.
    #[serde(default = "default_model_name")]
    pub model: String,

    /// Request timeout; `None` leaves the HTTP client default in place
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_model_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_model_base_url(),
            model: default_model_name(),
            timeout_secs: None,
        }
    }
}

/// Pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Rows fetched per context collection, newest first
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,

    /// Share one upstream call between concurrent identical requests
    #[serde(default)]
    pub coalesce_inflight: bool,
}

const fn default_recent_limit() -> u32 {
    5
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            coalesce_inflight: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
