//! Greenshelf CLI - Database migrations and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog database migrations
//! gs-cli migrate
//!
//! # Replace the catalog with the bundled seed products
//! gs-cli seed
//!
//! # Add one product
//! gs-cli products add --id 11 --name Kakao --brand Alnatura --country Peru --label Fairtrade
//!
//! # Search products
//! gs-cli products search --q kaffee --exclude-controversy Kinderarbeit
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog from YAML
//! - `products add` / `products search` - Manage and query products

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::products::{NewProductArgs, SearchArgs};

/// Log filter used when `RUST_LOG` is unset. Command output is logged at
/// INFO, so anything stricter hides it.
const DEFAULT_LOG_FILTER: &str = "gs_cli=info,greenshelf_catalog=info";

#[derive(Parser)]
#[command(name = "gs-cli")]
#[command(author, version, about = "Greenshelf catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with products (replaces the catalog atomically)
    Seed {
        /// YAML file with products (defaults to the bundled seed set)
        #[arg(short, long)]
        file: Option<String>,

        /// Keep existing products and add the new ones one by one, skipping taken ids
        #[arg(long)]
        keep_existing: bool,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a single product
    Add {
        /// Product id (must be unique and non-zero)
        #[arg(long)]
        id: i64,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Brand
        #[arg(short, long)]
        brand: String,

        /// Origin country
        #[arg(short, long)]
        country: String,

        /// Sustainability label (repeatable)
        #[arg(short, long = "label")]
        labels: Vec<String>,

        /// Controversy (repeatable)
        #[arg(long = "controversy")]
        controversies: Vec<String>,
    },
    /// Search products
    Search {
        /// Name contains (case-insensitive)
        #[arg(short, long)]
        q: Option<String>,

        /// Brand contains (case-insensitive)
        #[arg(short, long)]
        brand: Option<String>,

        /// Origin country contains (case-insensitive)
        #[arg(short, long)]
        country: Option<String>,

        /// Require at least one of these labels (repeatable)
        #[arg(short, long = "label")]
        labels: Vec<String>,

        /// Exclude products with this controversy (repeatable)
        #[arg(long = "exclude-controversy")]
        exclude_controversies: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for the CLI if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            file,
            keep_existing,
        } => commands::seed::products(file.as_deref(), keep_existing).await?,
        Commands::Products { action } => match action {
            ProductAction::Add {
                id,
                name,
                brand,
                country,
                labels,
                controversies,
            } => {
                commands::products::add(NewProductArgs {
                    id,
                    name,
                    brand,
                    country,
                    labels,
                    controversies,
                })
                .await?;
            }
            ProductAction::Search {
                q,
                brand,
                country,
                labels,
                exclude_controversies,
            } => {
                commands::products::search(SearchArgs {
                    q,
                    brand,
                    country,
                    labels,
                    exclude_controversies,
                })
                .await?;
            }
        },
    }
    Ok(())
}
