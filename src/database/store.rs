//! Persistence seam for product records.
//!
//! Handlers only talk to [`ProductStore`]; the PostgreSQL and in-memory
//! backends both implement it.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::database::manager::DatabaseError;
use crate::models::{Category, Product, ProductDraft};

/// Equality filters for listing products. Every supplied criterion must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub available: Option<bool>,
    pub price: Option<Decimal>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_ref().map_or(true, |n| &product.name == n)
            && self.category.map_or(true, |c| product.category == c)
            && self.available.map_or(true, |a| product.available == a)
            && self.price.map_or(true, |p| product.price == p)
    }
}

/// CRUD operations over product records keyed by a store-assigned id
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Human-readable backend name, used in logs
    fn backend_name(&self) -> &'static str;

    /// Persist a new product and return it with its assigned id
    async fn create(&self, draft: ProductDraft) -> Result<Product, DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError>;

    /// Replace every attribute of an existing product.
    ///
    /// Returns `DatabaseError::NotFound` when `id` does not exist.
    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Product, DatabaseError>;

    /// Remove a product. Returns whether a record was actually deleted.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Products matching `filter`, ordered by id
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError>;

    /// Remove every product and return how many were deleted
    async fn delete_all(&self) -> Result<u64, DatabaseError>;
}

pub(crate) fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("Product with id {} was not found", id))
}
