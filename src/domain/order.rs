use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::StorefrontError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    pub price: f64,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub utr: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    /// Wire form used by the backend.
    pub fn code(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(StorefrontError::Other(format!(
                "Unknown order status {:?} (expected pending, approved or rejected)",
                other
            ))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending approval"),
            OrderStatus::Approved => write!(f, "approved"),
            OrderStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Response to a successful order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub status: OrderStatus,
}

/// Order as returned by `GET /orders/{id}` and the admin listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub utr: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of the admin's `PATCH /orders/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}
