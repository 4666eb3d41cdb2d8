//! `PostgreSQL` product store.
//!
//! Queries are built at runtime so the filter can add only the predicates
//! that are set. Substring criteria use `strpos` on lowercased text rather
//! than `LIKE`, so `%` and `_` in user input are matched literally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use uuid::Uuid;

use greenshelf_core::{CategoryField, NewProduct, Product, ProductFilter, ProductId, ProductPatch};

use super::{ProductStore, RepositoryError, create_pool};

const PRODUCT_COLUMNS: &str = "record_id, id, name, brand, labels, controversies, origin_country, \
                               created_at, updated_at";

/// Product store backed by the `catalog.product` table.
///
/// The connection pool is created on first use and shared by every
/// subsequent operation.
pub struct PgProductStore {
    database_url: SecretString,
    pool: OnceCell<PgPool>,
}

impl PgProductStore {
    /// Create a store that connects lazily to `database_url`.
    #[must_use]
    pub fn new(database_url: SecretString) -> Self {
        Self {
            database_url,
            pool: OnceCell::new(),
        }
    }

    /// Get the connection pool, connecting on the first call.
    ///
    /// Concurrent first callers wait for a single connection attempt. A
    /// failed attempt is not cached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the connection cannot be established.
    pub async fn pool(&self) -> Result<&PgPool, RepositoryError> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                debug!("Connecting to catalog database");
                create_pool(&self.database_url).await
            })
            .await?;
        Ok(pool)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    #[instrument(skip(self))]
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let pool = self.pool().await?;

        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE TRUE"));

        if let Some(name) = filter.name() {
            query
                .push(" AND strpos(lower(name), lower(")
                .push_bind(name)
                .push(")) > 0");
        }
        if let Some(brand) = filter.brand() {
            query
                .push(" AND strpos(lower(brand), lower(")
                .push_bind(brand)
                .push(")) > 0");
        }
        if let Some(labels) = filter.labels() {
            query.push(" AND labels && ").push_bind(labels.to_vec());
        }
        if let Some(controversies) = filter.controversies() {
            query
                .push(" AND NOT (controversies && ")
                .push_bind(controversies.to_vec())
                .push(")");
        }
        if let Some(country) = filter.origin_country() {
            query
                .push(" AND strpos(lower(origin_country), lower(")
                .push_bind(country)
                .push(")) > 0");
        }
        query.push(" ORDER BY id ASC");

        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(pool)
            .await?;

        debug!(count = rows.len(), "Found products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let pool = self.pool().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let pool = self.pool().await?;
        let row = insert_row(pool, &product).await?;
        Ok(row.into())
    }

    #[instrument(skip(self, patch))]
    async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let pool = self.pool().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE catalog.product \
             SET name = COALESCE($2, name), \
                 brand = COALESCE($3, brand), \
                 labels = $4, \
                 controversies = $5, \
                 origin_country = COALESCE($6, origin_country), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.brand.as_deref())
        .bind(&patch.labels)
        .bind(&patch.controversies)
        .bind(patch.origin_country.as_deref())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn distinct(&self, field: CategoryField) -> Result<Vec<String>, RepositoryError> {
        let pool = self.pool().await?;

        let sql = match field {
            CategoryField::Labels => "SELECT DISTINCT unnest(labels) FROM catalog.product",
            CategoryField::Controversies => {
                "SELECT DISTINCT unnest(controversies) FROM catalog.product"
            }
            CategoryField::Brand => "SELECT DISTINCT brand FROM catalog.product",
            CategoryField::OriginCountry => "SELECT DISTINCT origin_country FROM catalog.product",
        };

        let values = sqlx::query_scalar::<_, String>(sql).fetch_all(pool).await?;
        Ok(values)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn replace_all(&self, products: Vec<NewProduct>) -> Result<u64, RepositoryError> {
        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM catalog.product")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for product in &products {
            insert_row(&mut *tx, product).await?;
        }

        // Dropping the transaction on any early return rolls it back
        tx.commit().await?;

        debug!(removed, inserted = products.len(), "Replaced catalog");
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").fetch_one(pool).await?;
        Ok(())
    }
}

/// Insert one product, mapping a duplicate `id` to `RepositoryError::Conflict`.
async fn insert_row<'e, E>(executor: E, product: &NewProduct) -> Result<ProductRow, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "INSERT INTO catalog.product (id, name, brand, labels, controversies, origin_country) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {PRODUCT_COLUMNS}"
    );

    sqlx::query_as::<_, ProductRow>(&sql)
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.labels)
        .bind(&product.controversies)
        .bind(&product.origin_country)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "product id {} already exists",
                    product.id
                ));
            }
            RepositoryError::Database(e)
        })
}

/// Internal row type for product queries.
#[derive(sqlx::FromRow)]
struct ProductRow {
    record_id: Uuid,
    id: i64,
    name: String,
    brand: String,
    labels: Vec<String>,
    controversies: Vec<String>,
    origin_country: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            record_id: row.record_id,
            id: ProductId::new(row.id),
            name: row.name,
            brand: row.brand,
            labels: row.labels,
            controversies: row.controversies,
            origin_country: row.origin_country,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
