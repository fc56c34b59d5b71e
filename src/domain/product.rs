use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque reference to a product's stored thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub id: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            sale_price: None,
            file_type: String::new(),
            thumbnail: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sale price when it actually undercuts the list price.
    pub fn effective_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale >= 0.0 && sale < self.price => sale,
            _ => self.price,
        }
    }

    pub fn is_on_sale(&self) -> bool {
        self.effective_price() < self.price
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    pub fn display_file_type(&self) -> &str {
        if self.file_type.is_empty() {
            "file"
        } else {
            &self.file_type
        }
    }
}

/// Amount in whole paise, rounded to the nearest one.
pub fn to_paise(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Formats an amount the way the storefront shows prices.
pub fn format_price(amount: f64) -> String {
    format!("₹{:.2}", amount)
}
