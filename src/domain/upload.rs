use std::path::Path;

use crate::app::{Result, StorefrontError};

/// A file attached to a product upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Names the attachment after the last path component and guesses the
    /// content type from its extension.
    pub fn from_path(path: &Path, bytes: Vec<u8>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes,
        }
    }

    /// Lowercased extension, used as the product's file type tag.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "epub" => "application/epub+zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// New product sent by an admin as `multipart/form-data` to `POST /products`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpload {
    pub title: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub file_type: String,
    pub file: Attachment,
    pub thumbnail: Option<Attachment>,
}

impl ProductUpload {
    /// Builds an upload whose file type tag comes from the file's extension.
    pub fn new(title: &str, price: f64, sale_price: Option<f64>, file: Attachment) -> Self {
        let file_type = file.extension().unwrap_or_else(|| "file".to_string());
        Self {
            title: title.trim().to_string(),
            price,
            sale_price,
            file_type,
            file,
            thumbnail: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: Attachment) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(StorefrontError::InvalidProduct("title is empty".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(StorefrontError::InvalidProduct(format!(
                "price must be a non-negative amount, got {}",
                self.price
            )));
        }
        if let Some(sale) = self.sale_price {
            if !sale.is_finite() || sale < 0.0 || sale >= self.price {
                return Err(StorefrontError::InvalidProduct(format!(
                    "sale price {} must be below the price {}",
                    sale, self.price
                )));
            }
        }
        if self.file.bytes.is_empty() {
            return Err(StorefrontError::InvalidProduct(format!(
                "{} is empty",
                self.file.file_name
            )));
        }
        if let Some(thumbnail) = &self.thumbnail {
            if !thumbnail.content_type.starts_with("image/") {
                return Err(StorefrontError::InvalidProduct(format!(
                    "thumbnail {} is not an image",
                    thumbnail.file_name
                )));
            }
        }
        Ok(())
    }
}
