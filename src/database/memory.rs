use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::store::{not_found, ProductFilter, ProductStore};
use crate::models::{Product, ProductDraft};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    products: BTreeMap<i64, Product>,
}

/// Product store kept in process memory. Ids are never reused, even after
/// `delete_all`, the same way a database sequence behaves.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let product = Product::from_draft(inner.last_id, draft);
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Product, DatabaseError> {
        let mut inner = self.inner.write().await;
        let slot = inner.products.get_mut(&id).ok_or_else(|| not_found(id))?;
        *slot = Product::from_draft(id, draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.products.remove(&id).is_some())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.products.values().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let mut inner = self.inner.write().await;
        let count = inner.products.len() as u64;
        inner.products.clear();
        Ok(count)
    }
}
