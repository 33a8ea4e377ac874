use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Hub, HubEvent, Machine, User};
use crate::table_sort::SortDirection;

/// `?sort=<column>&order=asc|desc` on table endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
    pub order: Option<SortDirection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<u32>,
}

/// Who is logged in and whether they see substitute data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub is_demo: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Everything the hub page renders, fetched in one round
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubDetailResponse {
    pub hub: Hub,
    pub discovered_machines: Vec<Machine>,
    pub events: Vec<HubEvent>,
}

#[derive(Debug, Serialize)]
pub struct MachineDetailResponse {
    pub machine: Machine,
    /// Numeric metrics, passed through untouched
    pub stats: Value,
}

/// Health status response for the /health endpoint
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always "healthy" while the process serves requests
    pub status: String,

    /// Seconds since the server started
    pub uptime_secs: u64,

    /// Backend the dashboard is talking to
    pub backend_url: String,
}

/// Error response for API endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Status indicator: error
    pub status: String,

    /// Error message details
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
