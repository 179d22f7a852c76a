// In-memory product store for handler tests

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ProductStore;
use crate::models::{NewProduct, Product};
use crate::types::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
    unavailable: bool,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails like an unreachable database.
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    fn check(&self) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        self.check()?;
        let record = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price: product.price,
            filename: product.filename,
            created_at: chrono::Utc::now(),
        };
        self.products.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> AppResult<Vec<Product>> {
        self.check()?;
        Ok(self.products.read().await.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn chair() -> NewProduct {
        NewProduct {
            name: "Chair".into(),
            description: "Wooden chair".into(),
            price: 49.99,
            filename: "abc123.jpg".into(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = InMemoryProductStore::new();
        let first = assert_ok!(store.create(chair()).await);
        let second = assert_ok!(store.create(chair()).await);

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryProductStore::unavailable();
        assert!(store.create(chair()).await.is_err());
        assert!(store.list_all().await.is_err());
        assert!(store.ping().await.is_err());
    }
}
