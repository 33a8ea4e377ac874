use std::time::Duration;

use serde::Deserialize;

const BASE_URL: &str = "http://127.0.0.1:5000";
const REQUEST_TIMEOUT: u64 = 15; // seconds
const CONNECT_TIMEOUT: u64 = 5; // seconds

/// Where and how to reach the backend API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT,
            connect_timeout_secs: CONNECT_TIMEOUT,
            user_agent: format!("GambinoAdmin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
