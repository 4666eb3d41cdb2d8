//! Product filter predicates.
//!
//! A [`ProductFilter`] combines independently optional criteria with logical
//! AND. An unset criterion imposes no constraint.
//!
//! | Criterion         | Field            | Semantics                              |
//! |-------------------|------------------|----------------------------------------|
//! | `name_contains`   | `name`           | case-insensitive substring             |
//! | `brand_contains`  | `brand`          | case-insensitive substring             |
//! | `any_label`       | `labels`         | at least one label in common           |
//! | `no_controversy`  | `controversies`  | none of the given controversies        |
//! | `country_contains`| `origin_country` | case-insensitive substring             |
//!
//! Label and controversy matching is exact string membership. Store
//! implementations must produce the same result set as [`ProductFilter::matches`].

use super::Product;

/// A combined filter over product records.
///
/// ```
/// use greenshelf_core::ProductFilter;
///
/// let filter = ProductFilter::new()
///     .name_contains("kaffee")
///     .any_label(["Fairtrade"])
///     .no_controversy(["Kinderarbeit"]);
/// assert!(!filter.is_unconstrained());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    name: Option<String>,
    brand: Option<String>,
    labels: Option<Vec<String>>,
    controversies: Option<Vec<String>>,
    origin_country: Option<String>,
}

impl ProductFilter {
    /// A filter that matches every product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to contain `needle`, ignoring case. Empty input is ignored.
    #[must_use]
    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name = non_empty(needle.into());
        self
    }

    /// Require `brand` to contain `needle`, ignoring case. Empty input is ignored.
    #[must_use]
    pub fn brand_contains(mut self, needle: impl Into<String>) -> Self {
        self.brand = non_empty(needle.into());
        self
    }

    /// Require `origin_country` to contain `needle`, ignoring case.
    /// Empty input is ignored.
    #[must_use]
    pub fn country_contains(mut self, needle: impl Into<String>) -> Self {
        self.origin_country = non_empty(needle.into());
        self
    }

    /// Require at least one of `labels`. An empty set imposes no constraint.
    #[must_use]
    pub fn any_label<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = non_empty_set(labels);
        self
    }

    /// Exclude products carrying any of `controversies`. An empty set imposes
    /// no constraint.
    #[must_use]
    pub fn no_controversy<I, S>(mut self, controversies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controversies = non_empty_set(controversies);
        self
    }

    /// The name substring, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The brand substring, if set.
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    /// The origin country substring, if set.
    #[must_use]
    pub fn origin_country(&self) -> Option<&str> {
        self.origin_country.as_deref()
    }

    /// The labels of which at least one must be present, if set.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// The controversies of which none may be present, if set.
    #[must_use]
    pub fn controversies(&self) -> Option<&[String]> {
        self.controversies.as_deref()
    }

    /// Returns `true` if no criterion is set.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluate the predicate against a single product.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.name
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&product.name, needle))
            && self
                .brand
                .as_deref()
                .is_none_or(|needle| contains_ignore_case(&product.brand, needle))
            && self
                .labels
                .as_deref()
                .is_none_or(|wanted| wanted.iter().any(|l| product.has_label(l)))
            && self
                .controversies
                .as_deref()
                .is_none_or(|excluded| !excluded.iter().any(|c| product.has_controversy(c)))
            && self
                .origin_country
                .as_deref()
                .is_none_or(|needle| contains_ignore_case(&product.origin_country, needle))
    }

    /// Keep the matching products, ordered by ascending `id`.
    #[must_use]
    pub fn select<I>(&self, products: I) -> Vec<Product>
    where
        I: IntoIterator<Item = Product>,
    {
        let mut selected: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        selected.sort_by_key(|p| p.id);
        selected
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn non_empty_set<I, S>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: Vec<String> = values
        .into_iter()
        .map(Into::into)
        .filter(|v| !v.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
