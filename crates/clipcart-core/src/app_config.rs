use std::net::SocketAddr;
use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub channels_path: PathBuf,
    pub storage_root: PathBuf,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_items: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub fallback_pool: Vec<PathBuf>,
    pub default_channel_id: Option<Uuid>,
    pub translate_endpoint: Option<String>,
    pub publish_endpoint: Option<String>,
    pub publish_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("channels_path", &self.channels_path)
            .field("storage_root", &self.storage_root)
            .field("raw_dir", &self.raw_dir)
            .field("processed_dir", &self.processed_dir)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_items", &self.max_concurrent_items)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("fallback_pool", &self.fallback_pool)
            .field("default_channel_id", &self.default_channel_id)
            .field("translate_endpoint", &self.translate_endpoint)
            .field("publish_endpoint", &self.publish_endpoint)
            .field(
                "publish_token",
                &self.publish_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
