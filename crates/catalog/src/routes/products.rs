//! Product REST handlers.
//!
//! ```text
//! GET  /products               - List products matching the query filters
//! POST /products               - Create a product (201)
//! GET  /products/categories    - Distinct labels, controversies, brands, countries
//! GET  /products/{id}          - Fetch one product
//! PUT  /products/{id}          - Update one product
//! ```
//!
//! Any other method on these paths answers 405 with an `Allow` header.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use greenshelf_core::{Categories, Product, ProductId, ProductInput};

use crate::error::{AppError, Result};
use crate::routes::params::FilterParams;
use crate::services::CatalogError;
use crate::state::AppState;

/// List products matching the query-string filters, ordered by id.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, params: FilterParams) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().list(&params.to_filter()).await?;
    Ok(Json(products))
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let product = state.catalog().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Distinct values of every categorical field.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Categories>> {
    let categories = state.catalog().categories().await?;
    Ok(Json(categories))
}

/// Fetch a single product by id.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = state.catalog().get(parse_id(&id)?).await?;
    Ok(Json(product))
}

/// Update a single product.
///
/// The body is checked before the id, so a malformed body is reported even
/// for an unknown product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let product = state.catalog().update(parse_id(&id)?, input).await?;
    Ok(Json(product))
}

/// A path id that is not an integer names no product.
fn parse_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::Catalog(CatalogError::ProductNotFound))
}

async fn collection_not_allowed() -> AppError {
    AppError::MethodNotAllowed("GET, POST")
}

async fn item_not_allowed() -> AppError {
    AppError::MethodNotAllowed("GET, PUT")
}

async fn categories_not_allowed() -> AppError {
    AppError::MethodNotAllowed("GET")
}

/// Create the product routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(index).post(create).fallback(collection_not_allowed),
        )
        .route(
            "/categories",
            get(categories).fallback(categories_not_allowed),
        )
        .route("/{id}", get(show).put(update).fallback(item_not_allowed))
}
