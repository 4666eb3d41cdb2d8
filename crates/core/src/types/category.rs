//! Category aggregation over the categorical product fields.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Product;

/// A categorical product field that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Labels,
    Controversies,
    Brand,
    OriginCountry,
}

impl CategoryField {
    /// The values this field takes on a single product.
    #[must_use]
    pub fn values(self, product: &Product) -> Vec<&str> {
        match self {
            Self::Labels => product.labels.iter().map(String::as_str).collect(),
            Self::Controversies => product.controversies.iter().map(String::as_str).collect(),
            Self::Brand => vec![product.brand.as_str()],
            Self::OriginCountry => vec![product.origin_country.as_str()],
        }
    }
}

/// Distinct non-empty values of each categorical field.
///
/// Sets serialize as sorted JSON arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub labels: BTreeSet<String>,
    pub controversies: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    pub countries: BTreeSet<String>,
}

impl Categories {
    /// Build from raw distinct values as returned by a store.
    ///
    /// Empty strings are dropped, including empty entries that came from
    /// inside a label or controversy list.
    #[must_use]
    pub fn from_distinct<L, C, B, O>(labels: L, controversies: C, brands: B, countries: O) -> Self
    where
        L: IntoIterator<Item = String>,
        C: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
        O: IntoIterator<Item = String>,
    {
        Self {
            labels: non_blank(labels),
            controversies: non_blank(controversies),
            brands: non_blank(brands),
            countries: non_blank(countries),
        }
    }
}

fn non_blank<I>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    values.into_iter().filter(|v| !v.is_empty()).collect()
}
