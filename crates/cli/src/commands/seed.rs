//! Seed the catalog with products from a YAML file.
//!
//! # Usage
//!
//! ```bash
//! # Replace the catalog with the bundled seed set
//! gs-cli seed
//!
//! # Add products from a custom file, keeping what is already stored
//! gs-cli seed --file products.yaml --keep-existing
//! ```
//!
//! The file is a YAML list of products using the JSON field names (`id`,
//! `produkt`, `marke`, `labels`, `controversy`, `herkunftsland`). Every entry
//! is validated before the store is touched, and replacing the catalog is a
//! single transaction.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use greenshelf_catalog::db::{ProductStore, RepositoryError};
use greenshelf_core::{NewProduct, ProductId, ProductInput, ValidationError};

use super::open_store;

/// Seed set compiled into the binary.
const BUNDLED_SEED: &str = include_str!("../../seed/products.yaml");

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file is not a YAML list of products.
    #[error("invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An entry failed product validation.
    #[error("seed entry {index}: {source}")]
    Invalid {
        index: usize,
        source: ValidationError,
    },

    /// The same id appears twice in the file.
    #[error("duplicate id {0} in seed file")]
    DuplicateId(ProductId),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Products deleted before inserting.
    pub removed: u64,
    /// Products inserted.
    pub inserted: usize,
    /// Products skipped because their id already existed.
    pub skipped: usize,
}

/// Parse and validate a YAML seed document.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed YAML, `SeedError::Invalid` for
/// the first entry that fails validation and `SeedError::DuplicateId` if an
/// id repeats.
pub fn parse_seed(yaml: &str) -> Result<Vec<NewProduct>, SeedError> {
    let inputs: Vec<ProductInput> = serde_yaml::from_str(yaml)?;

    let mut seen = HashSet::new();
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let product = input
                .validate()
                .map_err(|source| SeedError::Invalid { index, source })?;
            if !seen.insert(product.id) {
                return Err(SeedError::DuplicateId(product.id));
            }
            Ok(product)
        })
        .collect()
}

/// Write validated products into `store`.
///
/// Unless `keep_existing` is set, the catalog is replaced in one atomic step:
/// if anything fails, the previous products are still there. When keeping
/// existing products, each product is inserted on its own and ids that are
/// already taken are skipped.
///
/// # Errors
///
/// Returns `SeedError::Store` if a store operation fails.
pub async fn seed_store(
    store: &dyn ProductStore,
    products: Vec<NewProduct>,
    keep_existing: bool,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if !keep_existing {
        report.inserted = products.len();
        report.removed = store.replace_all(products).await?;
        info!(removed = report.removed, "Replaced existing products");
        return Ok(report);
    }

    for product in products {
        let id = product.id;
        match store.insert(product).await {
            Ok(_) => report.inserted += 1,
            Err(RepositoryError::Conflict(_)) => {
                warn!(product_id = %id, "Product already exists, skipping");
                report.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(report)
}

/// Seed the `PostgreSQL` catalog.
///
/// # Arguments
///
/// * `file_path` - YAML file to load; the bundled seed set when `None`
/// * `keep_existing` - Keep stored products instead of clearing them first
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or if database
/// operations fail.
pub async fn products(
    file_path: Option<&str>,
    keep_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            if !path.exists() {
                return Err(format!("File not found: {file_path}").into());
            }
            info!(path = %file_path, "Loading products from file");
            tokio::fs::read_to_string(path).await?
        }
        None => {
            info!("Loading bundled seed products");
            BUNDLED_SEED.to_owned()
        }
    };

    // Validate before connecting to the database
    let products = parse_seed(&content)?;
    info!(count = products.len(), "Seed file validated");

    let store = open_store()?;
    let report = seed_store(&store, products, keep_existing).await?;

    info!("Seeding complete!");
    info!("  Products removed: {}", report.removed);
    info!("  Products inserted: {}", report.inserted);
    info!("  Products skipped (already exist): {}", report.skipped);

    Ok(())
}
