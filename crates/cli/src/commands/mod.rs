//! CLI command implementations.

pub mod migrate;
pub mod products;
pub mod seed;

use greenshelf_catalog::db::PgProductStore;
use secrecy::SecretString;

/// Open the catalog `PostgreSQL` store named by `CATALOG_DATABASE_URL`
/// (or `DATABASE_URL`).
///
/// # Errors
///
/// Returns an error if neither variable is set.
pub fn open_store() -> Result<PgProductStore, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("CATALOG_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "CATALOG_DATABASE_URL not set")?;

    Ok(PgProductStore::new(database_url))
}
