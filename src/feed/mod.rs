//! Incremental catalog loading.
//!
//! ```text
//! render ──observe(last)──► Sentinel
//!   │                          │ hidden → visible
//!   ▼                          ▼
//! CatalogLoader ──fetch_next_page──► CatalogSource (background task)
//!   ▲                                      │
//!   └────────── poll_completions ◄─────────┘
//!                    │
//!                    ▼
//!               FeedState (dedupe, cursor, more-data)
//! ```

pub mod loader;
pub mod sentinel;
pub mod state;

pub use loader::CatalogLoader;
pub use sentinel::Sentinel;
pub use state::{FeedState, FetchOutcome, PageRequest, Phase, PAGE_SIZE};
