use serde::Deserialize;

/// Number of hub events shown on the hub detail page
pub const EVENT_LIMIT: u32 = 100;

/// Configuration for the dashboard API server
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Mark the session cookie `Secure`; turn on behind TLS
    pub secure_cookies: bool,

    /// actix worker threads, defaults to the number of cores
    pub workers: Option<usize>,

    /// Events fetched when a hub page or event log does not ask for a limit
    pub event_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            secure_cookies: false,
            workers: None,
            event_limit: EVENT_LIMIT,
        }
    }
}
