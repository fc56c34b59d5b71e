use std::path::PathBuf;
use std::sync::Arc;

use crate::api::HttpApiClient;
use crate::app::error::{Result, StorefrontError};
use crate::config::ApiConfig;
use crate::feed::CatalogLoader;
use crate::session::{AdminSession, CartStore, Preferences};
use crate::store::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub api: Arc<HttpApiClient>,
    pub api_config: ApiConfig,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, api_config: ApiConfig) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(store, api_config)
    }

    pub fn in_memory(api_config: ApiConfig) -> Result<Self> {
        Self::with_store(Arc::new(SqliteStore::in_memory()?), api_config)
    }

    fn with_store(store: Arc<SqliteStore>, api_config: ApiConfig) -> Result<Self> {
        let api = Arc::new(HttpApiClient::new(
            &api_config.base_url,
            api_config.timeout(),
        )?);

        Ok(Self {
            store,
            api,
            api_config,
        })
    }

    /// Fresh catalog loader reading from the backend.
    pub fn catalog_loader(&self) -> CatalogLoader {
        CatalogLoader::new(self.api.clone(), self.api_config.page_limit())
    }

    pub fn carts(&self) -> CartStore<'_, SqliteStore> {
        CartStore::new(self.store.as_ref())
    }

    pub fn preferences(&self) -> Preferences<'_, SqliteStore> {
        Preferences::new(self.store.as_ref())
    }

    pub fn admin_session(&self) -> AdminSession<'_, SqliteStore> {
        AdminSession::new(self.store.as_ref())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| StorefrontError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("storefront");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("storefront.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, Product};
    use crate::store::KeyValueStore;

    #[test]
    fn test_in_memory_context_shares_one_store() {
        let ctx = AppContext::in_memory(ApiConfig::default()).unwrap();

        let mut cart = ctx.carts().load().unwrap();
        cart.add(&Product::new("p1", "Ebook", 99.0));
        ctx.carts().save(&cart).unwrap();
        ctx.preferences().set_language(Language::Hindi).unwrap();

        assert_eq!(ctx.carts().load().unwrap().len(), 1);
        assert_eq!(ctx.preferences().language().unwrap(), Language::Hindi);
        assert!(ctx.store.get("cart").unwrap().is_some());
    }

    #[test]
    fn test_loader_uses_clamped_page_size() {
        let api_config = ApiConfig {
            page_size: 0,
            ..ApiConfig::default()
        };
        let ctx = AppContext::in_memory(api_config).unwrap();
        assert_eq!(ctx.catalog_loader().page_size(), 1);
    }
}
