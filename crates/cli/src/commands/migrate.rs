//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! gs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string for the catalog
//!
//! # Migration Files
//!
//! Catalog migrations live in `crates/catalog/migrations/` and are embedded
//! into the binary at build time.

use tracing::info;

use greenshelf_catalog::db::MIGRATOR;

use super::open_store;

/// Apply all pending catalog migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;

    info!("Connecting to catalog database...");
    let pool = store.pool().await?;

    info!("Running catalog migrations...");
    MIGRATOR.run(pool).await?;

    info!("Catalog migrations complete!");
    Ok(())
}
