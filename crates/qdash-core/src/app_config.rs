use std::net::SocketAddr;

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
    pub store_list_url: String,
    pub queue_url: String,
    pub upstream_timeout_secs: u64,
    pub user_agent: String,
    pub queue_chunk_size: usize,
    pub inter_chunk_delay_ms: u64,
    pub store_list_cache_secs: u64,
    pub api_key: Option<String>,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store_list_url", &self.store_list_url)
            .field("queue_url", &self.queue_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("queue_chunk_size", &self.queue_chunk_size)
            .field("inter_chunk_delay_ms", &self.inter_chunk_delay_ms)
            .field("store_list_cache_secs", &self.store_list_cache_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("rate_limit_window_ms", &self.rate_limit_window_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .finish()
    }
}
