use std::net::SocketAddr;
use std::path::PathBuf;

use crate::FlagMode;

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
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub leads_path: PathBuf,
    pub outscraper_api_key: String,
    pub provider_base_url: String,
    pub language: String,
    pub region: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_max_attempts: u32,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub flag_mode: FlagMode,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("leads_path", &self.leads_path)
            .field("outscraper_api_key", &"[redacted]")
            .field("provider_base_url", &self.provider_base_url)
            .field("language", &self.language)
            .field("region", &self.region)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("flag_mode", &self.flag_mode)
            .finish()
    }
}
