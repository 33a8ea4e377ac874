//! Periodic hub health check.
//!
//! Polls the hub list on a fixed interval and logs every hub that is offline
//! or has gone quiet. A failed poll is logged and the next tick tries again;
//! there is no retry or backoff in between.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

use crate::client::BackendClient;
use crate::models::Hub;

const POLL_INTERVAL: u64 = 60; // seconds
const STALE_AFTER: u64 = 180; // seconds

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub interval_secs: u64,
    /// A hub silent for longer than this is reported even if marked online
    pub stale_after_secs: u64,
}

impl WatcherConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval_secs: POLL_INTERVAL,
            stale_after_secs: STALE_AFTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubHealth {
    Healthy,
    Offline,
    /// Marked online but no heartbeat within the threshold
    Stale { silent_for: Duration },
    /// Online with no heartbeat on record
    NeverSeen,
}

impl HubHealth {
    pub fn assess(hub: &Hub, now: DateTime<Utc>, stale_after: Duration) -> Self {
        if !hub.is_online() {
            return HubHealth::Offline;
        }
        let Some(last) = hub.last_heartbeat else {
            return HubHealth::NeverSeen;
        };
        // A heartbeat from the future (clock skew) counts as fresh
        let silent_for = (now - last).to_std().unwrap_or(Duration::ZERO);
        if silent_for > stale_after {
            HubHealth::Stale { silent_for }
        } else {
            HubHealth::Healthy
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HubHealth::Healthy)
    }
}

/// One poll: fetch hubs and return those that need attention
#[instrument(skip(client, token))]
pub async fn poll_once(
    client: &BackendClient,
    token: &str,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> Result<Vec<(Hub, HubHealth)>> {
    let hubs = client.hubs(token).await?;
    debug!("Fetched {} hubs", hubs.len());
    Ok(hubs
        .into_iter()
        .filter_map(|hub| {
            let health = HubHealth::assess(&hub, now, stale_after);
            (!health.is_healthy()).then_some((hub, health))
        })
        .collect())
}

/// Polls until Ctrl-C
pub async fn watch_hubs(client: BackendClient, token: String, config: WatcherConfig) -> Result<()> {
    watch_hubs_until(client, token, config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Polls until `shutdown` resolves. The future is polled across every
/// iteration, so a shutdown requested mid-poll ends the loop after it.
pub async fn watch_hubs_until<F>(
    client: BackendClient,
    token: String,
    config: WatcherConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    info!(
        "Watching hubs every {:?} (stale after {:?})",
        config.interval(),
        config.stale_after()
    );
    let mut ticker = interval(config.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Stopping hub watcher");
                break;
            }
            _ = ticker.tick() => {
                match poll_once(&client, &token, Utc::now(), config.stale_after()).await {
                    Ok(unhealthy) if unhealthy.is_empty() => info!("All hubs healthy"),
                    Ok(unhealthy) => {
                        for (hub, health) in unhealthy {
                            warn!("Hub {} ({}) needs attention: {:?}",
                                hub.hub_id, hub.name.as_deref().unwrap_or("unnamed"), health);
                        }
                    }
                    Err(e) => error!("Hub poll failed: {:#}", e),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendConfig;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn hub(status: &str, seconds_ago: Option<i64>) -> Hub {
        Hub {
            hub_id: "pi-1".into(),
            status: Some(status.into()),
            last_heartbeat: seconds_ago.map(|s| now() - chrono::Duration::seconds(s)),
            ..Default::default()
        }
    }

    #[test]
    fn test_assess() {
        let stale_after = Duration::from_secs(180);
        assert_eq!(HubHealth::assess(&hub("online", Some(30)), now(), stale_after), HubHealth::Healthy);
        assert_eq!(HubHealth::assess(&hub("offline", Some(30)), now(), stale_after), HubHealth::Offline);
        assert_eq!(HubHealth::assess(&hub("online", None), now(), stale_after), HubHealth::NeverSeen);
        assert_eq!(
            HubHealth::assess(&hub("online", Some(600)), now(), stale_after),
            HubHealth::Stale { silent_for: Duration::from_secs(600) }
        );
        assert_eq!(HubHealth::assess(&hub("online", Some(-60)), now(), stale_after), HubHealth::Healthy);
    }

    #[tokio::test]
    async fn test_poll_once_reports_only_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/admin/hubs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"hubs": [
                    {"hubId": "pi-ok", "status": "online", "lastHeartbeat": "2026-10-19T11:59:00Z"},
                    {"hubId": "pi-down", "status": "offline", "lastHeartbeat": "2026-10-19T09:00:00Z"},
                    {"hubId": "pi-quiet", "status": "online", "lastHeartbeat": "2026-10-19T11:00:00Z"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = BackendClient::new(&BackendConfig::new(server.url())).unwrap();
        let unhealthy = poll_once(&client, "tok", now(), Duration::from_secs(180)).await.unwrap();
        let ids: Vec<&str> = unhealthy.iter().map(|(h, _)| h.hub_id.as_str()).collect();
        assert_eq!(ids, vec!["pi-down", "pi-quiet"]);
        assert_eq!(unhealthy[0].1, HubHealth::Offline);
    }

    #[tokio::test]
    async fn test_poll_once_surfaces_backend_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/admin/hubs")
            .with_status(401)
            .with_body(r#"{"error": "Token expired"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&BackendConfig::new(server.url())).unwrap();
        let err = poll_once(&client, "tok", now(), Duration::from_secs(180)).await.unwrap_err();
        assert!(err.to_string().contains("Token expired"));
    }

    #[tokio::test]
    async fn test_watch_polls_then_stops_on_shutdown() {
        let mut server = mockito::Server::new_async().await;
        let hubs = server
            .mock("GET", "/api/admin/hubs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"hubs": []}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let client = BackendClient::new(&BackendConfig::new(server.url())).unwrap();
        let config = WatcherConfig { interval_secs: 30, stale_after_secs: 180 };
        // first tick is immediate; shutdown lands well before the second
        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            watch_hubs_until(client, "tok".into(), config, tokio::time::sleep(Duration::from_millis(300))),
        )
        .await;

        assert!(matches!(stopped, Ok(Ok(()))));
        hubs.assert_async().await;
    }
}
