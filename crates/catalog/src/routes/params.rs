//! Product filter query parameters.
//!
//! Query strings are parsed by hand rather than through `Query<T>` because a
//! list parameter may arrive as a single value (`labels=Bio`), repeated
//! (`labels=Bio&labels=Fairtrade`) or in bracket form (`labels[]=Bio`).
//! All three normalize to a list here, before any filtering happens.
//!
//! | Parameter       | Aliases                    |
//! |-----------------|----------------------------|
//! | `q`             |                            |
//! | `brand`         | `marke`                    |
//! | `labels`        | `label`                    |
//! | `controversies` | `controversy`              |
//! | `originCountry` | `herkunftsland`            |
//!
//! Empty values are ignored. Unknown parameters are ignored.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use url::form_urlencoded;

use greenshelf_core::ProductFilter;

/// Filter criteria as supplied by the client, normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub q: Option<String>,
    pub brand: Option<String>,
    pub labels: Vec<String>,
    pub controversies: Vec<String>,
    pub origin_country: Option<String>,
}

impl FilterParams {
    /// Parse a raw (still percent-encoded) query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let value = value.into_owned();
            match key.strip_suffix("[]").unwrap_or(&*key) {
                "q" => params.q = Some(value),
                "brand" | "marke" => params.brand = Some(value),
                "labels" | "label" => params.labels.push(value),
                "controversies" | "controversy" => params.controversies.push(value),
                "originCountry" | "herkunftsland" => params.origin_country = Some(value),
                _ => {}
            }
        }

        params
    }

    /// Build the product filter for these criteria.
    #[must_use]
    pub fn to_filter(&self) -> ProductFilter {
        let mut filter = ProductFilter::new()
            .any_label(&self.labels)
            .no_controversy(&self.controversies);
        if let Some(q) = &self.q {
            filter = filter.name_contains(q);
        }
        if let Some(brand) = &self.brand {
            filter = filter.brand_contains(brand);
        }
        if let Some(country) = &self.origin_country {
            filter = filter.country_contains(country);
        }
        filter
    }

    /// Returns `true` if a label is among the selected ones.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Returns `true` if a controversy is among the excluded ones.
    #[must_use]
    pub fn has_controversy(&self, controversy: &str) -> bool {
        self.controversies.iter().any(|c| c == controversy)
    }
}

impl<S> FromRequestParts<S> for FilterParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}
