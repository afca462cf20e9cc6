use rust_decimal::Decimal;
use sqlx::{postgres::PgArguments, query::QueryAs, Postgres};

use crate::database::store::ProductFilter;
use crate::models::ProductRow;

pub const PRODUCTS_TABLE: &str = "products";

pub const PRODUCT_COLUMNS: &str = "id, name, description, price, available, category";

/// A bind parameter collected while building a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Bool(bool),
    Decimal(Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Turns a [`ProductFilter`] into a parameterized SELECT over the products table
pub struct QueryBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self { conditions: vec![], params: vec![] }
    }

    pub fn filter(mut self, filter: &ProductFilter) -> Self {
        if let Some(name) = &filter.name {
            self.push_eq("name", SqlParam::Text(name.clone()));
        }
        if let Some(category) = filter.category {
            self.push_eq("category", SqlParam::Text(category.as_str().to_string()));
        }
        if let Some(available) = filter.available {
            self.push_eq("available", SqlParam::Bool(available));
        }
        if let Some(price) = filter.price {
            self.push_eq("price", SqlParam::Decimal(price));
        }
        self
    }

    fn push_eq(&mut self, column: &str, param: SqlParam) {
        self.params.push(param);
        self.conditions.push(format!("\"{}\" = ${}", column, self.params.len()));
    }

    pub fn to_select_sql(self) -> SqlResult {
        let query = [
            format!("SELECT {} FROM \"{}\"", PRODUCT_COLUMNS, PRODUCTS_TABLE),
            if self.conditions.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", self.conditions.join(" AND "))
            },
            "ORDER BY id".to_string(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params: self.params }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn bind_param<'q>(
    q: QueryAs<'q, Postgres, ProductRow, PgArguments>,
    p: &'q SqlParam,
) -> QueryAs<'q, Postgres, ProductRow, PgArguments> {
    match p {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Decimal(d) => q.bind(*d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn no_filter_selects_everything_in_id_order() {
        let sql = QueryBuilder::new().filter(&ProductFilter::default()).to_select_sql();
        assert_eq!(
            sql.query,
            "SELECT id, name, description, price, available, category FROM \"products\" ORDER BY id"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn single_filter_binds_one_param() {
        let filter = ProductFilter { category: Some(Category::Food), ..Default::default() };
        let sql = QueryBuilder::new().filter(&filter).to_select_sql();
        assert!(sql.query.contains("WHERE \"category\" = $1 ORDER BY id"), "{}", sql.query);
        assert_eq!(sql.params, vec![SqlParam::Text("FOOD".into())]);
    }

    #[test]
    fn combined_filters_number_params_in_order() {
        let filter = ProductFilter {
            name: Some("Hat".into()),
            available: Some(false),
            price: Some(Decimal::new(999, 2)),
            ..Default::default()
        };
        let sql = QueryBuilder::new().filter(&filter).to_select_sql();
        assert!(
            sql.query.contains("WHERE \"name\" = $1 AND \"available\" = $2 AND \"price\" = $3"),
            "{}",
            sql.query
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Text("Hat".into()),
                SqlParam::Bool(false),
                SqlParam::Decimal(Decimal::new(999, 2)),
            ]
        );
    }
}
