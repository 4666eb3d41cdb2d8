//! Product records and write validation.
//!
//! Wire names follow the catalog's established JSON format (`produkt`,
//! `marke`, `controversy`, `herkunftsland`). Inputs also accept the English
//! names (`name`, `brand`, `controversies`, `originCountry`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductId;

/// Errors produced while validating a product payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are absent or falsy.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// A field present in an update payload is empty.
    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}

/// A stored product, including the fields owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Storage-assigned record identity.
    #[serde(rename = "_id")]
    pub record_id: Uuid,
    pub id: ProductId,
    #[serde(rename = "produkt")]
    pub name: String,
    #[serde(rename = "marke")]
    pub brand: String,
    pub labels: Vec<String>,
    #[serde(rename = "controversy")]
    pub controversies: Vec<String>,
    #[serde(rename = "herkunftsland")]
    pub origin_country: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns `true` if the product carries the given label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Returns `true` if the product is associated with the given controversy.
    #[must_use]
    pub fn has_controversy(&self, controversy: &str) -> bool {
        self.controversies.iter().any(|c| c == controversy)
    }
}

/// Loosely-typed product payload as received from clients.
///
/// Every field is optional so that missing values can be reported together
/// instead of failing on the first absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "produkt", alias = "name")]
    pub name: Option<String>,
    #[serde(default, rename = "marke", alias = "brand")]
    pub brand: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default, rename = "controversy", alias = "controversies")]
    pub controversies: Option<Vec<String>>,
    #[serde(default, rename = "herkunftsland", alias = "originCountry")]
    pub origin_country: Option<String>,
}

impl ProductInput {
    /// Validate the payload for insertion.
    ///
    /// `id`, `produkt`, `marke` and `herkunftsland` are required; an `id` of
    /// zero or an empty string counts as missing. `labels` and `controversy`
    /// default to empty lists.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] listing every missing field.
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let id = self.id.filter(|id| *id != 0);
        let name = non_empty(self.name);
        let brand = non_empty(self.brand);
        let origin_country = non_empty(self.origin_country);

        match (id, name, brand, origin_country) {
            (Some(id), Some(name), Some(brand), Some(origin_country)) => Ok(NewProduct {
                id: ProductId::new(id),
                name,
                brand,
                labels: self.labels.unwrap_or_default(),
                controversies: self.controversies.unwrap_or_default(),
                origin_country,
            }),
            (id, name, brand, origin_country) => {
                let missing = [
                    ("id", id.is_none()),
                    ("produkt", name.is_none()),
                    ("marke", brand.is_none()),
                    ("herkunftsland", origin_country.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, is_missing)| is_missing.then_some(field))
                .collect();
                Err(ValidationError::MissingFields(missing))
            }
        }
    }

    /// Convert the payload into an update patch.
    ///
    /// Any `id` in the payload is ignored; the identifier of an existing
    /// product never changes. Omitted `labels`/`controversy` clear the lists.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if a scalar field is present
    /// but empty.
    pub fn into_patch(self) -> Result<ProductPatch, ValidationError> {
        Ok(ProductPatch {
            name: present_non_empty(self.name, "produkt")?,
            brand: present_non_empty(self.brand, "marke")?,
            labels: self.labels.unwrap_or_default(),
            controversies: self.controversies.unwrap_or_default(),
            origin_country: present_non_empty(self.origin_country, "herkunftsland")?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn present_non_empty(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if v.is_empty() => Err(ValidationError::EmptyField(field)),
        other => Ok(other),
    }
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    #[serde(rename = "produkt")]
    pub name: String,
    #[serde(rename = "marke")]
    pub brand: String,
    pub labels: Vec<String>,
    #[serde(rename = "controversy")]
    pub controversies: Vec<String>,
    #[serde(rename = "herkunftsland")]
    pub origin_country: String,
}

impl NewProduct {
    /// Materialize the stored record with store-owned fields.
    #[must_use]
    pub fn into_product(self, record_id: Uuid, now: DateTime<Utc>) -> Product {
        Product {
            record_id,
            id: self.id,
            name: self.name,
            brand: self.brand,
            labels: self.labels,
            controversies: self.controversies,
            origin_country: self.origin_country,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Replacement of a product's mutable fields.
///
/// `None` scalars keep the stored value; the lists are always replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub labels: Vec<String>,
    pub controversies: Vec<String>,
    pub origin_country: Option<String>,
}

impl ProductPatch {
    /// Apply the patch in place and bump `updated_at`.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(brand) = &self.brand {
            product.brand.clone_from(brand);
        }
        product.labels.clone_from(&self.labels);
        product.controversies.clone_from(&self.controversies);
        if let Some(origin_country) = &self.origin_country {
            product.origin_country.clone_from(origin_country);
        }
        product.updated_at = now;
    }
}
