use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{AdminGateway, CatalogSource, OrderGateway};
use crate::app::{Result, StorefrontError};
use crate::domain::{
    Attachment, Order, OrderReceipt, OrderRequest, OrderStatus, PageResult, Product,
    ProductUpload, StatusUpdate,
};

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    success: Option<bool>,
}

pub struct HttpApiClient {
    client: Client,
    base_url: Url,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `orders/{id}` with the id escaped as a single path segment.
    fn order_url(&self, order_id: &str) -> Result<Url> {
        let mut url = self.endpoint("orders")?;
        url.path_segments_mut()
            .map_err(|_| StorefrontError::Config("API base URL cannot be a base".into()))?
            .push(order_id);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = Self::success_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn success_body(response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(StorefrontError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }
}

fn attachment_part(attachment: &Attachment) -> Result<Part> {
    Ok(Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.content_type)?)
}

fn upload_form(upload: &ProductUpload) -> Result<Form> {
    let mut form = Form::new()
        .text("title", upload.title.clone())
        .text("price", upload.price.to_string())
        .text("fileType", upload.file_type.clone())
        .part("file", attachment_part(&upload.file)?);

    if let Some(sale) = upload.sale_price {
        form = form.text("salePrice", sale.to_string());
    }
    if let Some(thumbnail) = &upload.thumbnail {
        form = form.part("thumbnail", attachment_part(thumbnail)?);
    }
    Ok(form)
}

/// Ensures the base URL ends with `/` so relative joins keep its path.
fn normalize_base(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

#[async_trait]
impl CatalogSource for HttpApiClient {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResult> {
        let mut url = self.endpoint("products")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        Self::decode(response).await
    }
}

#[async_trait]
impl OrderGateway for HttpApiClient {
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt> {
        let url = self.endpoint("orders")?;
        tracing::debug!("POST {} items={}", url, request.items.len());

        let response = self.client.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn get_order(&self, order_id: &str) -> Result<Order> {
        let url = self.order_url(order_id)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl AdminGateway for HttpApiClient {
    async fn login(&self, password: &str) -> Result<()> {
        let url = self.endpoint("admin/login")?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { password })
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(StorefrontError::InvalidPassword);
        }

        let body = Self::success_body(response).await?;
        match serde_json::from_slice::<LoginReply>(&body) {
            Ok(LoginReply {
                success: Some(false),
            }) => Err(StorefrontError::InvalidPassword),
            _ => Ok(()),
        }
    }

    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let mut url = self.endpoint("orders")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.code());
        }
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        let url = self.order_url(order_id)?;
        tracing::debug!("PATCH {} status={}", url, status.code());

        let response = self
            .client
            .patch(url)
            .json(&StatusUpdate { status })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn upload_product(&self, upload: &ProductUpload) -> Result<Product> {
        upload.validate()?;
        let url = self.endpoint("products")?;
        tracing::debug!(
            "POST {} file={} ({} bytes)",
            url,
            upload.file.file_name,
            upload.file.bytes.len()
        );

        let response = self
            .client
            .post(url)
            .multipart(upload_form(upload)?)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = HttpApiClient::new("https://shop.example.com/api", Duration::from_secs(5))
            .unwrap();
        assert_eq!(client.base_url().as_str(), "https://shop.example.com/api/");
        assert_eq!(
            client.endpoint("/products").unwrap().as_str(),
            "https://shop.example.com/api/products"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpApiClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(StorefrontError::InvalidUrl(_))));
    }
}
