pub mod sqlite;

use crate::app::Result;

pub use sqlite::SqliteStore;

/// Key-value persistence injected into whatever needs to remember state
/// between runs: saved cart, language preference and admin session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Returns `true` if the key existed.
    fn remove(&self, key: &str) -> Result<bool>;
    fn clear(&self) -> Result<()>;
}
