use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A venue that hosts one or more hubs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub store_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Store {
    pub fn status(&self) -> StoreStatus {
        StoreStatus::parse(self.status.as_deref().unwrap_or_default())
    }
}

/// Lifecycle status of a store, ordered the way the stores table ranks it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreStatus {
    Active,
    Pending,
    Inactive,
    Unknown,
}

impl StoreStatus {
    /// Lenient parse; anything unrecognised is `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => StoreStatus::Active,
            "pending" => StoreStatus::Pending,
            "inactive" => StoreStatus::Inactive,
            _ => StoreStatus::Unknown,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "_id": "65f0c1",
            "storeId": "gallatin_nimbus_298",
            "storeName": "Nimbus 1",
            "zipCode": "37066",
            "feePercentage": 12.5,
            "machineCount": 8
        });
        let store: Store = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(store.store_id, "gallatin_nimbus_298");
        assert_eq!(store.extra.get("machineCount"), Some(&json!(8)));
        assert_eq!(serde_json::to_value(&store).unwrap(), raw);
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!(StoreStatus::parse("Active"), StoreStatus::Active);
        assert_eq!(StoreStatus::parse(" pending "), StoreStatus::Pending);
        assert_eq!(StoreStatus::parse("closed"), StoreStatus::Unknown);
        assert!(StoreStatus::Active < StoreStatus::Pending);
        assert!(StoreStatus::Pending < StoreStatus::Inactive);
    }
}
