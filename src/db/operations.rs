use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewProduct, Product};
use crate::types::AppResult;

/// Persistence seam for product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a product and returns the stored record, including the id and
    /// timestamp assigned on insert.
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Every stored product, in the store's own order.
    async fn list_all(&self) -> AppResult<Vec<Product>>;

    async fn ping(&self) -> AppResult<()>;
}

/// Postgres-backed product store.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, description, price, filename)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price, filename, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.filename)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_all(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, filename, created_at FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> AppResult<()> {
        super::health_check(&self.pool).await
    }
}
