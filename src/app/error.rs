use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Invalid UTR: {0}")]
    InvalidUtr(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error("Admin password rejected")]
    InvalidPassword,

    #[error("Admin session missing or expired; run `storefront admin login`")]
    AdminSessionRequired,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
