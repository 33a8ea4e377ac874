use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// On-site controller relaying machine events to the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub hub_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    /// `online` or `offline` as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hub {
    pub fn is_online(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("online"))
            .unwrap_or(false)
    }
}

/// One entry of a hub's live event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubEvent {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,

    /// Display label for the machine column; filled in for demo sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hub_deserializes_heartbeat() {
        let hub: Hub = serde_json::from_value(json!({
            "hubId": "pi-2-nimbus-1",
            "name": "Nimbus back room",
            "status": "online",
            "lastHeartbeat": "2026-10-19T12:00:00Z",
            "piVersion": "4B"
        }))
        .unwrap();
        assert!(hub.is_online());
        assert_eq!(hub.last_heartbeat.unwrap().timestamp(), 1_792_411_200);
        assert_eq!(hub.extra.get("piVersion"), Some(&json!("4B")));
    }

    #[test]
    fn test_hub_without_status_is_not_online() {
        let hub = Hub { hub_id: "pi-1".into(), ..Default::default() };
        assert!(!hub.is_online());
    }
}
