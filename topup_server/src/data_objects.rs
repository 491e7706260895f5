use serde::{Deserialize, Serialize};
use serde_json::Value;
use topup_engine::{db_types::Order, Dashboard};

/// Any JSON value is accepted for `status`, so that an unknown order is reported before an unusable status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: Value,
}

impl StatusUpdateRequest {
    /// The requested status as text. A missing status is empty; non-string values keep their JSON text.
    pub fn status_text(&self) -> String {
        match &self.status {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub message: String,
    pub order: Order,
    pub payment_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdatedResponse {
    pub message: String,
    pub order: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub received: bool,
}
