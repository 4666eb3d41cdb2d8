//! Product storage.
//!
//! # Backends
//!
//! - [`PgProductStore`] - `PostgreSQL` table `catalog.product`
//! - [`InMemoryProductStore`] - process-local store for development and tests
//!
//! Both backends implement [`ProductStore`] and must return identical result
//! sets for the same [`ProductFilter`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/catalog/migrations/` and run via:
//! ```bash
//! cargo run -p greenshelf-cli -- migrate
//! ```

pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use greenshelf_core::{CategoryField, NewProduct, Product, ProductFilter, ProductId, ProductPatch};

pub use memory::InMemoryProductStore;
pub use products::PgProductStore;

/// Embedded schema migrations for the catalog database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., duplicate product id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations needed by the catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products matching `filter`, ordered by ascending `id`.
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    /// The product with the given caller-assigned `id`.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a validated product.
    ///
    /// Returns `RepositoryError::Conflict` if a product with the same `id`
    /// already exists.
    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Apply `patch` to the product with `id`, returning the updated record,
    /// or `None` if no such product exists.
    async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Distinct values of a categorical field across all products.
    ///
    /// List fields are flattened. Blank values may be included; callers
    /// filter them.
    async fn distinct(&self, field: CategoryField) -> Result<Vec<String>, RepositoryError>;

    /// Replace the whole catalog with `products` in one atomic step,
    /// returning how many products were removed.
    ///
    /// On error the previous catalog is left untouched. Returns
    /// `RepositoryError::Conflict` if `products` repeats an id.
    async fn replace_all(&self, products: Vec<NewProduct>) -> Result<u64, RepositoryError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
