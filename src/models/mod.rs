use serde::{Deserialize, Serialize};

use crate::utils::de_decimal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementRequest {
    pub id: i64,
    pub requestor_name: String,
    pub title: String,
    pub department: String,
    pub vendor_name: String,
    pub vendor_vat_id: Option<String>,
    pub commodity_group_id: Option<String>,
    pub commodity_group: Option<CommodityGroup>,
    #[serde(deserialize_with = "de_decimal")]
    pub total_cost: f64,
    pub current_status: String,
    pub created_at: String,
    #[serde(default)]
    pub order_lines: Vec<OrderLine>,
    #[serde(default)]
    pub status_events: Vec<StatusEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub product: Option<String>,
    pub description: String,
    #[serde(deserialize_with = "de_decimal")]
    pub unit_price: f64,
    pub amount: i64,
    pub unit: Option<String>,
    #[serde(deserialize_with = "de_decimal")]
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub id: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_at: String,
    pub changed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityGroup {
    pub id: String,
    pub category: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementRequestCreate {
    pub requestor_name: String,
    pub title: String,
    pub department: String,
    pub vendor_name: String,
    pub vendor_vat_id: Option<String>,
    pub order_lines: Vec<OrderLineCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineCreate {
    pub product: Option<String>,
    pub description: String,
    pub unit_price: f64,
    pub amount: i64,
    pub unit: Option<String>,
}

/// Returned by the upload-offer endpoint once the attachment is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    pub attachment_id: i64,
    pub filename: String,
}

/// Client-local tracker for one offer upload. Never sent to the server;
/// the id is a millis-timestamp/filename composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub filename: String,
    pub status: QueueStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Processing,
    Completed,
    Failed,
}

impl QueueStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, QueueStatus::Completed | QueueStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_requests: usize,
    pub open_count: usize,
    pub in_progress_count: usize,
    pub closed_count: usize,
    pub total_cost: f64,
    pub spend_by_group: Vec<GroupSpend>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpend {
    pub group_id: String,
    pub group_name: String,
    pub total: f64,
}
