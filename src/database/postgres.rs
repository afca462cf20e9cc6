use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::{bind_param, QueryBuilder, PRODUCT_COLUMNS};
use crate::database::store::{not_found, ProductFilter, ProductStore};
use crate::models::{Product, ProductDraft, ProductRow};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(100) NOT NULL,
        description VARCHAR(250) NOT NULL DEFAULT '',
        price       NUMERIC(14, 2) NOT NULL DEFAULT 0,
        available   BOOLEAN NOT NULL DEFAULT TRUE,
        category    VARCHAR(32) NOT NULL DEFAULT 'UNKNOWN'
    )
"#;

/// Product store backed by a PostgreSQL `products` table
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using configuration and make sure the table exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(config).await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Create the products table if it is missing. No migrations beyond this.
    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        info!("Ensured products table exists");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, DatabaseError> {
        let sql = format!(
            "INSERT INTO products (name, description, price, available, category) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.price)
            .bind(draft.available)
            .bind(draft.category.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(Product::try_from(row)?)
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::try_from).transpose()?)
    }

    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Product, DatabaseError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, price = $4, available = $5, category = $6 \
             WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.price)
            .bind(draft.available)
            .bind(draft.category.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(Product::try_from(row)?)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError> {
        let sql_result = QueryBuilder::new().filter(filter).to_select_sql();
        debug!("Listing products: {}", sql_result.query);

        let mut q = sqlx::query_as::<_, ProductRow>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| Product::try_from(row).map_err(DatabaseError::from))
            .collect()
    }

    async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM products").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
