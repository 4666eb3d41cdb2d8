//! In-memory product store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use greenshelf_core::{CategoryField, NewProduct, Product, ProductFilter, ProductId, ProductPatch};

use super::{ProductStore, RepositoryError};

/// Product store held in process memory.
///
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(filter.select(products.iter().cloned()))
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(RepositoryError::Conflict(format!(
                "product id {} already exists",
                product.id
            )));
        }

        let product = product.into_product(Uuid::new_v4(), Utc::now());
        products.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            patch.apply(product, Utc::now());
            product.clone()
        }))
    }

    async fn distinct(&self, field: CategoryField) -> Result<Vec<String>, RepositoryError> {
        let products = self.products.read().await;
        let mut values: Vec<String> = products
            .iter()
            .flat_map(|p| field.values(p))
            .map(str::to_owned)
            .collect();
        values.sort_unstable();
        values.dedup();
        Ok(values)
    }

    async fn replace_all(&self, products: Vec<NewProduct>) -> Result<u64, RepositoryError> {
        let now = Utc::now();
        let mut replacement: Vec<Product> = Vec::with_capacity(products.len());
        for product in products {
            if replacement.iter().any(|p| p.id == product.id) {
                return Err(RepositoryError::Conflict(format!(
                    "product id {} already exists",
                    product.id
                )));
            }
            replacement.push(product.into_product(Uuid::new_v4(), now));
        }

        let mut stored = self.products.write().await;
        let removed = stored.len() as u64;
        *stored = replacement;
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_product(id: i64, name: &str, labels: &[&str]) -> NewProduct {
        NewProduct {
            id: ProductId::new(id),
            name: name.to_owned(),
            brand: "Alnatura".to_owned(),
            labels: labels.iter().map(ToString::to_string).collect(),
            controversies: Vec::new(),
            origin_country: "Peru".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_record_fields() {
        let store = InMemoryProductStore::new();
        let product = store.insert(new_product(11, "Kakao", &["Fairtrade"])).await.unwrap();

        assert_eq!(product.id, ProductId::new(11));
        assert_eq!(product.created_at, product.updated_at);
        assert!(!product.record_id.is_nil());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = InMemoryProductStore::new();
        store.insert(new_product(1, "Kaffee", &[])).await.unwrap();

        let err = store.insert(new_product(1, "Tee", &[])).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.find(&ProductFilter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_all_swaps_catalog() {
        let store = InMemoryProductStore::new();
        store.insert(new_product(99, "Alt", &[])).await.unwrap();

        let removed = store
            .replace_all(vec![new_product(1, "Kaffee", &[]), new_product(2, "Tee", &[])])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        let ids: Vec<_> = store
            .find(&ProductFilter::new())
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_replace_all_keeps_catalog_on_conflict() {
        let store = InMemoryProductStore::new();
        store.insert(new_product(99, "Alt", &[])).await.unwrap();

        let err = store
            .replace_all(vec![new_product(1, "Kaffee", &[]), new_product(1, "Tee", &[])])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        let remaining = store.find(&ProductFilter::new()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.first().unwrap().name, "Alt");
    }

    #[tokio::test]
    async fn test_find_orders_by_id() {
        let store = InMemoryProductStore::new();
        store.insert(new_product(3, "Tee", &[])).await.unwrap();
        store.insert(new_product(1, "Kaffee", &[])).await.unwrap();

        let ids: Vec<i64> = store
            .find(&ProductFilter::new())
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_none() {
        let store = InMemoryProductStore::new();
        let updated = store
            .update(ProductId::new(999), &ProductPatch::default())
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let store = InMemoryProductStore::new();
        let created = store.insert(new_product(1, "Kaffee", &["Bio"])).await.unwrap();

        let patch = ProductPatch {
            name: Some("Espresso".to_owned()),
            ..ProductPatch::default()
        };
        let updated = store.update(ProductId::new(1), &patch).await.unwrap().unwrap();

        assert_eq!(updated.record_id, created.record_id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Espresso");
        assert_eq!(updated.brand, "Alnatura");
        assert!(updated.labels.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_flattens_lists() {
        let store = InMemoryProductStore::new();
        store.insert(new_product(1, "Kaffee", &["Bio", "Fairtrade"])).await.unwrap();
        store.insert(new_product(2, "Tee", &["Bio"])).await.unwrap();

        let labels = store.distinct(CategoryField::Labels).await.unwrap();
        assert_eq!(labels, vec!["Bio", "Fairtrade"]);

        let countries = store.distinct(CategoryField::OriginCountry).await.unwrap();
        assert_eq!(countries, vec!["Peru"]);
    }
}
