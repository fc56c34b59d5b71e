//! # Storefront
//!
//! Terminal client for a digital-goods storefront: an infinite-scroll
//! catalog, a persistent cart, UPI checkout confirmed by UTR, and admin
//! commands to review orders and upload products.
//!
//! ## Architecture
//!
//! ```text
//! Backend API → CatalogLoader → TUI / CLI
//!                     ↑
//!          Sentinel (last visible row)
//! ```
//!
//! - [`api`]: REST client for `/products` and `/orders`
//! - [`feed`]: Incremental catalog loader with dedupe and a single fetch in flight
//! - [`store`]: SQLite key-value persistence for the cart and preferences
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse the catalog
//! storefront browse
//!
//! # Add a product and check out
//! storefront cart add 65f1c0e2a4
//! storefront checkout --utr 123456789012 --email me@example.com
//!
//! # Review orders as admin
//! storefront admin login --password ...
//! storefront admin orders
//! storefront admin approve 65f1d2b7c1
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the backend
/// client and the local store.
pub mod app;

/// Backend API access.
///
/// - [`CatalogSource`](api::CatalogSource): paged product listing
/// - [`OrderGateway`](api::OrderGateway): order submission and lookup
/// - [`AdminGateway`](api::AdminGateway): order review and product upload
/// - [`HttpApiClient`](api::HttpApiClient): reqwest-based implementation of all three
pub mod api;

/// Cart validation and order construction.
pub mod checkout;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/storefront/config.toml`: backend URL, colors
/// and keybindings.
pub mod config;

/// Core domain models: products, catalog pages, cart, orders, language.
pub mod domain;

/// Incremental catalog loading.
pub mod feed;

/// Cart, preference and admin session persistence on top of [`store`].
pub mod session;

/// SQLite persistence layer.
///
/// - [`KeyValueStore`](store::KeyValueStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Terminal user interface.
///
/// Catalog list on the left, product details and cart on the right.
/// Scrolling to the last product loads the next page. Fixed text follows
/// the stored language preference.
pub mod tui;
