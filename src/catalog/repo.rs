use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Product, Review};
use crate::auth::repo::StoreError;

/// Read-only access to products and their reviews.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>, StoreError>;
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn list_reviews(
        &self,
        product_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, StoreError>;
}

#[derive(Clone)]
pub struct PgCatalogStore {
    db: PgPool,
}

impl PgCatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_id, unit_amount, currency, image_url, created_at
            FROM products
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_id, unit_amount, currency, image_url, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_reviews(
        &self,
        product_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, StoreError> {
        // NULL product_id means "all products"
        let rows = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, product_id, author, rating, body, created_at
            FROM reviews
            WHERE ($1::uuid IS NULL OR product_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
pub use memory::InMemoryCatalog;
