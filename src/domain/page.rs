use serde::{Deserialize, Serialize};

use crate::domain::Product;

/// One page of the product listing as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(rename = "files")]
    pub products: Vec<Product>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl PageResult {
    /// Whether the backend reports pages beyond this one.
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}
