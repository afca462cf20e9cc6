pub mod manager;
pub mod memory;
pub mod postgres;
pub mod query_builder;
pub mod store;

use std::sync::Arc;

use tracing::warn;

use crate::config::DatabaseConfig;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;
pub use store::{ProductFilter, ProductStore};

/// Pick the store backend from configuration: PostgreSQL when a database URL
/// is configured, otherwise an in-memory store.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, DatabaseError> {
    if config.url.is_some() {
        let store = PgProductStore::connect(config).await?;
        Ok(Arc::new(store))
    } else {
        warn!("No DATABASE_URI configured; products are kept in memory and lost on restart");
        Ok(Arc::new(MemoryProductStore::new()))
    }
}
