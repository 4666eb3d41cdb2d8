//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{CatalogConfig, StoreBackend};
use crate::db::{InMemoryProductStore, PgProductStore, ProductStore};
use crate::services::CatalogService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    store: Arc<dyn ProductStore>,
}

impl AppState {
    /// Create application state around an existing store.
    #[must_use]
    pub fn new(config: CatalogConfig, store: Arc<dyn ProductStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Create application state with the store selected by `config`.
    ///
    /// A `PostgreSQL` store does not connect until its first query.
    #[must_use]
    pub fn from_config(config: CatalogConfig) -> Self {
        let store: Arc<dyn ProductStore> = match &config.store {
            StoreBackend::Postgres { database_url } => {
                Arc::new(PgProductStore::new(database_url.clone()))
            }
            StoreBackend::Memory => Arc::new(InMemoryProductStore::new()),
        };
        Self::new(config, store)
    }

    /// Get a reference to the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn store(&self) -> &dyn ProductStore {
        self.inner.store.as_ref()
    }

    /// Catalog service over the shared store.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.store())
    }
}
