//! Browser page handlers.
//!
//! ```text
//! GET  /         - Start page with catalog size and latest products
//! GET  /search   - Filter form and matching products
//! GET  /review   - Review form
//! POST /review   - Validate and acknowledge a review
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use greenshelf_core::{Categories, Product, ProductFilter, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::routes::params::FilterParams;
use crate::services::CatalogError;
use crate::state::AppState;

/// Number of products shown on the start page.
const LATEST_COUNT: usize = 5;

// =============================================================================
// Templates
// =============================================================================

/// Start page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub total: usize,
    pub latest: Vec<Product>,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub params: FilterParams,
    pub categories: Categories,
    pub products: Vec<Product>,
}

/// Review page template.
#[derive(Template, WebTemplate)]
#[template(path = "review.html")]
pub struct ReviewTemplate {
    pub products: Vec<Product>,
    pub form: ReviewForm,
    pub errors: Vec<String>,
    pub submitted: Option<String>,
}

// =============================================================================
// Review form
// =============================================================================

/// Review form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub product_id: String,
    pub rating: String,
    pub text: String,
    pub co2: String,
}

/// A review that passed form validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub product_id: ProductId,
    pub rating: u8,
    pub text: String,
    pub co2_kg: Option<f64>,
}

impl ReviewForm {
    /// Check the fields that need no store access.
    ///
    /// # Errors
    ///
    /// Returns every problem found, in form order.
    pub fn validate(&self) -> std::result::Result<Review, Vec<String>> {
        let mut errors = Vec::new();

        let product_id = self.product_id.parse::<ProductId>().ok();
        if product_id.is_none() {
            errors.push("Bitte ein Produkt auswählen.".to_owned());
        }

        let rating = self
            .rating
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|r| (1..=5).contains(r));
        if rating.is_none() {
            errors.push("Die Bewertung muss zwischen 1 und 5 Sternen liegen.".to_owned());
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.push("Bitte einen Bewertungstext eingeben.".to_owned());
        }

        let co2 = self.co2.trim();
        let co2_kg = if co2.is_empty() {
            Some(None)
        } else {
            co2.replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(Some)
        };
        if co2_kg.is_none() {
            errors.push("Der CO₂-Wert muss eine nicht-negative Zahl sein.".to_owned());
        }

        match (product_id, rating, co2_kg) {
            (Some(product_id), Some(rating), Some(co2_kg)) if errors.is_empty() => Ok(Review {
                product_id,
                rating,
                text: text.to_owned(),
                co2_kg,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Start page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Response> {
    let (total, latest) = state.catalog().latest(LATEST_COUNT).await?;
    Ok(HomeTemplate { total, latest }.into_response())
}

/// Search page.
///
/// Uses the same parameters as `GET /products`.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, params: FilterParams) -> Result<Response> {
    let catalog = state.catalog();
    let filter = params.to_filter();
    let (categories, products) = tokio::try_join!(catalog.categories(), catalog.list(&filter))?;

    Ok(SearchTemplate {
        params,
        categories,
        products,
    }
    .into_response())
}

/// Review form.
#[instrument(skip(state))]
pub async fn review_form(State(state): State<AppState>) -> Result<Response> {
    let products = state.catalog().list(&ProductFilter::new()).await?;
    Ok(ReviewTemplate {
        products,
        form: ReviewForm::default(),
        errors: Vec::new(),
        submitted: None,
    }
    .into_response())
}

/// Review submission.
///
/// Reviews are acknowledged and logged but not stored.
#[instrument(skip(state, form))]
pub async fn submit_review(
    State(state): State<AppState>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let catalog = state.catalog();
    let products = catalog.list(&ProductFilter::new()).await?;

    let outcome = match form.validate() {
        Ok(review) => match catalog.get(review.product_id).await {
            Ok(product) => Ok((review, product)),
            Err(CatalogError::ProductNotFound) => {
                Err(vec!["Das gewählte Produkt existiert nicht.".to_owned()])
            }
            Err(e) => return Err(e.into()),
        },
        Err(errors) => Err(errors),
    };

    let template = match outcome {
        Ok((review, product)) => {
            tracing::info!(
                product_id = %review.product_id,
                rating = review.rating,
                co2_kg = ?review.co2_kg,
                "Review submitted"
            );
            let product_id = review.product_id.to_string();
            add_breadcrumb(
                "review",
                "Review submitted",
                Some(&[("product_id", product_id.as_str())]),
            );
            ReviewTemplate {
                products,
                form: ReviewForm::default(),
                errors: Vec::new(),
                submitted: Some(product.name),
            }
        }
        Err(errors) => ReviewTemplate {
            products,
            form,
            errors,
            submitted: None,
        },
    };

    Ok(template.into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(product_id: &str, rating: &str, text: &str, co2: &str) -> ReviewForm {
        ReviewForm {
            product_id: product_id.to_owned(),
            rating: rating.to_owned(),
            text: text.to_owned(),
            co2: co2.to_owned(),
        }
    }

    #[test]
    fn test_valid_review() {
        let review = form("3", "4", "  Lecker und fair  ", "1,5").validate().unwrap();
        assert_eq!(review.product_id, ProductId::new(3));
        assert_eq!(review.rating, 4);
        assert_eq!(review.text, "Lecker und fair");
        assert_eq!(review.co2_kg, Some(1.5));
    }

    #[test]
    fn test_co2_is_optional() {
        let review = form("1", "5", "Gut", "").validate().unwrap();
        assert_eq!(review.co2_kg, None);
    }

    #[test]
    fn test_rating_out_of_range() {
        let errors = form("1", "6", "Gut", "").validate().unwrap_err();
        assert_eq!(errors.len(), 1);

        assert!(form("1", "0", "Gut", "").validate().is_err());
    }

    #[test]
    fn test_reports_every_problem() {
        let errors = form("", "", " ", "-2").validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
