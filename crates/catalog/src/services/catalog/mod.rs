//! Catalog service.
//!
//! Sits between the HTTP handlers and the [`ProductStore`]: validates write
//! payloads, maps store outcomes to catalog errors, and aggregates categories.

mod error;

pub use error::CatalogError;

use tracing::{info, instrument};

use greenshelf_core::{Categories, CategoryField, Product, ProductFilter, ProductId, ProductInput};

use crate::db::{ProductStore, RepositoryError};

/// Catalog service.
///
/// Borrowed per request from the shared store.
pub struct CatalogService<'a> {
    store: &'a dyn ProductStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a dyn ProductStore) -> Self {
        Self { store }
    }

    /// List products matching `filter`, ordered by ascending `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.find(filter).await?)
    }

    /// The `limit` products with the highest ids, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store query fails.
    pub async fn latest(&self, limit: usize) -> Result<(usize, Vec<Product>), CatalogError> {
        let products = self.store.find(&ProductFilter::new()).await?;
        let total = products.len();
        Ok((total, products.into_iter().rev().take(limit).collect()))
    }

    /// Fetch a single product by its caller-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this id.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Validate and insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if required fields are missing.
    /// Returns `CatalogError::DuplicateId` if the id is already taken.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let product = input.validate()?;

        if self.store.find_by_id(product.id).await?.is_some() {
            return Err(CatalogError::DuplicateId);
        }

        // The unique constraint still catches concurrent inserts of the same id
        let created = self.store.insert(product).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CatalogError::DuplicateId,
            other => CatalogError::Repository(other),
        })?;

        info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Replace the mutable fields of an existing product.
    ///
    /// Validation runs before the product is looked up.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a provided scalar is empty.
    /// Returns `CatalogError::ProductNotFound` if no product has this id.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, CatalogError> {
        let patch = input.into_patch()?;

        let updated = self
            .store
            .update(id, &patch)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        info!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    /// Distinct non-empty values of every categorical field.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if any store query fails.
    pub async fn categories(&self) -> Result<Categories, CatalogError> {
        let (labels, controversies, brands, countries) = tokio::try_join!(
            self.store.distinct(CategoryField::Labels),
            self.store.distinct(CategoryField::Controversies),
            self.store.distinct(CategoryField::Brand),
            self.store.distinct(CategoryField::OriginCountry),
        )?;

        Ok(Categories::from_distinct(labels, controversies, brands, countries))
    }
}
