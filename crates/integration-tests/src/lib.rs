//! Integration tests for the Greenshelf catalog.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store only
//! cargo test -p greenshelf-integration-tests
//!
//! # Include the PostgreSQL-backed tests
//! CATALOG_DATABASE_URL=postgres://localhost/greenshelf_test \
//!     cargo test -p greenshelf-integration-tests -- --include-ignored
//! ```
//!
//! Each test spawns the production router on an ephemeral port and talks to
//! it over HTTP.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use greenshelf_catalog::{
    app,
    config::CatalogConfig,
    db::{InMemoryProductStore, ProductStore},
    state::AppState,
};
use serde_json::Value;

/// A catalog server bound to `127.0.0.1:0`, aborted on drop.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server backed by an empty in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if no ephemeral port can be bound.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemoryProductStore::new())).await
    }

    /// Spawn a server backed by `store`.
    ///
    /// # Panics
    ///
    /// Panics if no ephemeral port can be bound.
    pub async fn spawn_with_store(store: Arc<dyn ProductStore>) -> Self {
        let state = AppState::new(CatalogConfig::in_memory(), store);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("listener has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST each product in `products` to `/products`.
    ///
    /// # Panics
    ///
    /// Panics if any product is not created.
    pub async fn create_all(&self, products: &[Value]) {
        for product in products {
            let response = self
                .client
                .post(self.url("/products"))
                .json(product)
                .send()
                .await
                .expect("request failed");
            assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Products used throughout the HTTP tests.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        serde_json::json!({
            "id": 1,
            "produkt": "Kaffee",
            "marke": "Starbucks",
            "labels": ["Fairtrade", "EU Bio", "Klimaneutral"],
            "controversy": ["Kinderarbeit"],
            "herkunftsland": "Kolumbien"
        }),
        serde_json::json!({
            "id": 2,
            "produkt": "Schokolade",
            "marke": "Ritter Sport",
            "labels": ["Fairtrade"],
            "controversy": [],
            "herkunftsland": "Deutschland"
        }),
        serde_json::json!({
            "id": 3,
            "produkt": "Bananen",
            "marke": "Chiquita",
            "labels": ["Rainforest Alliance"],
            "controversy": ["Pestizide", "Kinderarbeit"],
            "herkunftsland": "Ecuador"
        }),
        serde_json::json!({
            "id": 4,
            "produkt": "Hafermilch",
            "marke": "Oatly",
            "labels": ["Vegan", "Klimaneutral"],
            "controversy": [],
            "herkunftsland": "Schweden"
        }),
    ]
}
