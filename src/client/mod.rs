//! Typed client for the Gambino backend REST API.
//!
//! The backend owns every piece of state the dashboard shows. This client
//! issues one request per call, with no retries; a failed call surfaces as a
//! `BackendError` carrying the backend's status and message.

pub mod config;
pub mod error;

pub use config::BackendConfig;
pub use error::BackendError;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, trace, warn};
use url::Url;
use urlencoding::encode;

use crate::models::{Hub, HubEvent, Machine, Store, User};

/// Operator credentials for `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        // Validate once up front so per-call failures are about the path only
        Url::parse(&config.base_url)?;

        debug!("Initializing backend client for {} with user agent: {}", config.base_url, config.user_agent);
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                error!("Failed to build HTTP client: {}", e);
                e
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn get(&self, token: &str, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(path)?;
        trace!("GET {}", url);
        Ok(self.http.get(url).bearer_auth(token))
    }

    fn post(&self, token: &str, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(path)?;
        trace!("POST {}", url);
        Ok(self.http.post(url).bearer_auth(token))
    }

    /// Sends the request and decodes the body, unwrapping `{ "<envelope>": ... }`
    /// when the backend wraps its payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        envelope: Option<&str>,
    ) -> Result<T, BackendError> {
        let response = request.send().await.map_err(|e| {
            warn!("Backend request failed: {}", e);
            e
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body, status);
            warn!("Backend answered {}: {}", status, message);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)?
        };
        Ok(unwrap_envelope(value, envelope)?)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult, BackendError> {
        let url = self.endpoint("/api/auth/login")?;
        debug!("Logging in against {}", url);
        self.execute(self.http.post(url).json(credentials), None).await
    }

    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &str) -> Result<User, BackendError> {
        self.execute(self.get(token, "/api/users/profile")?, Some("user")).await
    }

    #[instrument(skip(self, token))]
    pub async fn stores(&self, token: &str) -> Result<Vec<Store>, BackendError> {
        self.execute(self.get(token, "/api/admin/stores")?, Some("stores")).await
    }

    #[instrument(skip(self, token))]
    pub async fn hubs(&self, token: &str) -> Result<Vec<Hub>, BackendError> {
        self.execute(self.get(token, "/api/admin/hubs")?, Some("hubs")).await
    }

    #[instrument(skip(self, token))]
    pub async fn hub(&self, token: &str, hub_id: &str) -> Result<Hub, BackendError> {
        let path = format!("/api/admin/hubs/{}", encode(hub_id));
        self.execute(self.get(token, &path)?, Some("hub")).await
    }

    #[instrument(skip(self, token))]
    pub async fn hub_discovered_machines(&self, token: &str, hub_id: &str) -> Result<Vec<Machine>, BackendError> {
        let path = format!("/api/admin/hubs/{}/discovered-machines", encode(hub_id));
        self.execute(self.get(token, &path)?, Some("machines")).await
    }

    #[instrument(skip(self, token))]
    pub async fn hub_events(&self, token: &str, hub_id: &str, limit: Option<u32>) -> Result<Vec<HubEvent>, BackendError> {
        let path = format!("/api/admin/hubs/{}/events", encode(hub_id));
        let mut request = self.get(token, &path)?;
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        self.execute(request, Some("events")).await
    }

    #[instrument(skip(self, token))]
    pub async fn regenerate_hub_token(&self, token: &str, hub_id: &str) -> Result<Value, BackendError> {
        let path = format!("/api/admin/hubs/{}/regenerate-token", encode(hub_id));
        self.execute(self.post(token, &path)?, None).await
    }

    #[instrument(skip(self, token))]
    pub async fn machine(&self, token: &str, machine_id: &str) -> Result<Machine, BackendError> {
        let path = format!("/api/admin/machines/{}", encode(machine_id));
        self.execute(self.get(token, &path)?, Some("machine")).await
    }

    #[instrument(skip(self, token))]
    pub async fn machine_stats(&self, token: &str, machine_id: &str) -> Result<Value, BackendError> {
        let path = format!("/api/admin/machines/{}/stats", encode(machine_id));
        self.execute(self.get(token, &path)?, Some("stats")).await
    }

    #[instrument(skip(self, token))]
    pub async fn user(&self, token: &str, user_id: &str) -> Result<User, BackendError> {
        let path = format!("/api/admin/users/{}", encode(user_id));
        self.execute(self.get(token, &path)?, Some("user")).await
    }

    #[instrument(skip(self, token, changes))]
    pub async fn update_user(&self, token: &str, user_id: &str, changes: &Value) -> Result<User, BackendError> {
        let url = self.endpoint(&format!("/api/admin/users/{}", encode(user_id)))?;
        trace!("PUT {}", url);
        let request = self.http.put(url).bearer_auth(token).json(changes);
        self.execute(request, Some("user")).await
    }

    #[instrument(skip(self, token, binding))]
    pub async fn validate_binding(&self, token: &str, binding: &Value) -> Result<Value, BackendError> {
        let request = self.post(token, "/api/machines/validate-binding")?.json(binding);
        self.execute(request, None).await
    }

    #[instrument(skip(self, token, binding))]
    pub async fn bind_machine(&self, token: &str, binding: &Value) -> Result<Value, BackendError> {
        let request = self.post(token, "/api/machines/bind")?.json(binding);
        self.execute(request, None).await
    }

    #[instrument(skip(self, token))]
    pub async fn machine_qr_code(&self, token: &str, machine_id: &str) -> Result<Value, BackendError> {
        let path = format!("/api/machines/{}/qr-code", encode(machine_id));
        self.execute(self.get(token, &path)?, None).await
    }
}

fn unwrap_envelope<T: DeserializeOwned>(value: Value, envelope: Option<&str>) -> Result<T, serde_json::Error> {
    let inner = match (value, envelope) {
        (Value::Object(mut map), Some(key)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        (other, _) => other,
    };
    serde_json::from_value(inner)
}

fn error_message(body: &[u8], status: StatusCode) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_accepts_both_shapes() {
        let wrapped: Vec<Store> =
            unwrap_envelope(json!({"success": true, "stores": [{"storeId": "s-1"}]}), Some("stores")).unwrap();
        let bare: Vec<Store> = unwrap_envelope(json!([{"storeId": "s-1"}]), Some("stores")).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped[0].store_id, "s-1");
    }

    #[test]
    fn test_error_message_prefers_backend_text() {
        let body = br#"{"error": "Hub not found"}"#;
        assert_eq!(error_message(body, StatusCode::NOT_FOUND), "Hub not found");
        assert_eq!(error_message(b"<html>", StatusCode::BAD_GATEWAY), "Bad Gateway");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            BackendClient::new(&BackendConfig::new("not a url")),
            Err(BackendError::Url(_))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = BackendClient::new(&BackendConfig::new("http://backend.local/")).unwrap();
        assert_eq!(
            client.endpoint("/api/admin/stores").unwrap().as_str(),
            "http://backend.local/api/admin/stores"
        );
    }

    #[tokio::test]
    async fn test_hub_path_is_escaped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/admin/hubs/pi%202")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"hub": {"hubId": "pi 2", "status": "online"}}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&BackendConfig::new(server.url())).unwrap();
        let hub = client.hub("tok", "pi 2").await.unwrap();
        assert_eq!(hub.hub_id, "pi 2");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_backend_error_carries_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/admin/machines/m-404")
            .with_status(404)
            .with_body(r#"{"message": "Machine not found"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&BackendConfig::new(server.url())).unwrap();
        let err = client.machine("tok", "m-404").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Machine not found"));
    }
}
