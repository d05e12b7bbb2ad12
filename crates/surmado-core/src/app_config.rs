use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

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
    pub env: Environment,
    pub api_key: Option<String>,
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub webhook_path: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub poll_interval_secs: u64,
    pub poll_timeout_mins: u64,
    pub download_dir: Option<PathBuf>,
    pub download_queue_capacity: usize,
}

impl AppConfig {
    /// Returns the API key, or an error naming the variable that supplies it.
    ///
    /// The key is optional at load time because the webhook receiver never
    /// calls the API; every client entry point goes through this accessor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `SURMADO_API_KEY` was unset.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SURMADO_API_KEY".to_string()))
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_mins.saturating_mul(60))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .field("webhook_path", &self.webhook_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_timeout_mins", &self.poll_timeout_mins)
            .field("download_dir", &self.download_dir)
            .field("download_queue_capacity", &self.download_queue_capacity)
            .finish()
    }
}
