//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! # Pages
//! GET  /                       - Start page
//! GET  /search                 - Product search form and results
//! GET  /review                 - Review form
//! POST /review                 - Submit a review
//!
//! # Products (JSON)
//! GET  /products               - List/filter products
//! POST /products               - Create product
//! GET  /products/categories    - Category aggregation
//! GET  /products/{id}          - Product detail
//! PUT  /products/{id}          - Update product
//! ```

pub mod pages;
pub mod params;
pub mod products;

use axum::{Router, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/search", get(pages::search))
        .route("/review", get(pages::review_form).post(pages::submit_review))
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_owned())
}

/// Create all routes for the catalog.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .nest("/products", products::router())
}
