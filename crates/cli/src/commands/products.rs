//! Product management commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a single product
//! gs-cli products add --id 11 --name Kakao --brand Alnatura --country Peru \
//!     --label Fairtrade --label "EU Bio" --controversy Regenwaldrodung
//!
//! # Search with the same semantics as GET /products
//! gs-cli products search --label Fairtrade --exclude-controversy Kinderarbeit
//! ```

use tracing::info;

use greenshelf_catalog::services::CatalogService;
use greenshelf_core::{Product, ProductFilter, ProductInput};

use super::open_store;

/// Fields for a new product.
#[derive(Debug, Clone)]
pub struct NewProductArgs {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub country: String,
    pub labels: Vec<String>,
    pub controversies: Vec<String>,
}

impl From<NewProductArgs> for ProductInput {
    fn from(args: NewProductArgs) -> Self {
        Self {
            id: Some(args.id),
            name: Some(args.name),
            brand: Some(args.brand),
            labels: Some(args.labels),
            controversies: Some(args.controversies),
            origin_country: Some(args.country),
        }
    }
}

/// Search criteria.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub q: Option<String>,
    pub brand: Option<String>,
    pub country: Option<String>,
    pub labels: Vec<String>,
    pub exclude_controversies: Vec<String>,
}

impl SearchArgs {
    /// Build the product filter for these criteria.
    #[must_use]
    pub fn to_filter(&self) -> ProductFilter {
        let mut filter = ProductFilter::new()
            .any_label(&self.labels)
            .no_controversy(&self.exclude_controversies);
        if let Some(q) = &self.q {
            filter = filter.name_contains(q);
        }
        if let Some(brand) = &self.brand {
            filter = filter.brand_contains(brand);
        }
        if let Some(country) = &self.country {
            filter = filter.country_contains(country);
        }
        filter
    }
}

/// Validate and insert a single product.
///
/// # Errors
///
/// Returns an error if validation fails, the id is taken, or the database
/// is unreachable.
pub async fn add(args: NewProductArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let product = CatalogService::new(&store).create(args.into()).await?;

    info!(
        product_id = %product.id,
        record_id = %product.record_id,
        "Product saved: {} ({})",
        product.name,
        product.brand
    );
    Ok(())
}

/// Run a product search and log the matches.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn search(args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let products = CatalogService::new(&store).list(&args.to_filter()).await?;

    log_matches(&products);
    Ok(())
}

/// Log one line per product, preceded by the match count.
pub fn log_matches(products: &[Product]) {
    info!("Found {} products", products.len());
    for product in products {
        info!(
            "  {:>4}  {} | {} | {} | labels: {} | controversies: {}",
            product.id.as_i64(),
            product.name,
            product.brand,
            product.origin_country,
            product.labels.join(", "),
            product.controversies.join(", ")
        );
    }
}
