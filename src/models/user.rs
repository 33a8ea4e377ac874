use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A platform account: operator, venue staff or player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Read-only demo account; every screen shows substitute data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_demo: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn is_demo(&self) -> bool {
        self.is_demo.unwrap_or(false)
    }
}

/// A ledger entry against a user account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Identifier the counterparty name is derived from
    pub fn counterparty_key(&self) -> &str {
        match self.user_id.as_deref() {
            Some(user_id) if !user_id.is_empty() => user_id,
            _ => &self.id,
        }
    }
}
