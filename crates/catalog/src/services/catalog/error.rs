//! Catalog error types.

use thiserror::Error;

use greenshelf_core::ValidationError;

use crate::db::RepositoryError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product with the requested id.
    #[error("Product not found")]
    ProductNotFound,

    /// A product with the same id already exists.
    #[error("Product with this ID already exists")]
    DuplicateId,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
