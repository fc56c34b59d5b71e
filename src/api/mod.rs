pub mod http_client;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{
    Order, OrderReceipt, OrderRequest, OrderStatus, PageResult, Product, ProductUpload,
};

pub use http_client::HttpApiClient;

/// Remote source of the paginated product listing.
#[async_trait]
pub trait CatalogSource {
    /// Fetch one page (1-based) of `limit` products.
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResult>;
}

/// Order submission and lookup against the backend.
#[async_trait]
pub trait OrderGateway {
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt>;
    async fn get_order(&self, order_id: &str) -> Result<Order>;
}

/// Store management calls made from the admin panel.
#[async_trait]
pub trait AdminGateway {
    /// Checks the admin password against the backend.
    async fn login(&self, password: &str) -> Result<()>;
    /// Orders in `status`, or every order when `None`.
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>>;
    async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order>;
    async fn upload_product(&self, upload: &ProductUpload) -> Result<Product>;
}
