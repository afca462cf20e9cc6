use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 250;

/// Fractional digits kept for prices (matches the NUMERIC(14,2) column)
pub const PRICE_SCALE: u32 = 2;

/// Largest price the NUMERIC(14,2) column can hold: 999999999999.99
pub fn max_price() -> Decimal {
    Decimal::new(99_999_999_999_999, PRICE_SCALE)
}

/// Validation errors raised while turning a request payload into a product
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    #[error("Invalid product: body must be a JSON object")]
    NotAnObject,

    #[error("Invalid product: missing {0}")]
    MissingField(&'static str),

    #[error("Invalid product: {field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid product: price must not be negative")]
    NegativePrice,

    #[error("Invalid product: price must not exceed {0}")]
    PriceOutOfRange(Decimal),

    #[error("Invalid product: {0}")]
    BadAttribute(String),

    #[error("Invalid category: {0}")]
    UnknownCategory(String),
}

/// Closed set of product categories, serialized by upper-case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive lookup by name. Request bodies go through serde instead,
/// which only accepts the exact upper-case names.
impl FromStr for Category {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ProductError::UnknownCategory(s.to_string()))
    }
}

/// A persisted product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    pub fn from_draft(id: i64, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            available: draft.available,
            category: draft.category,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Product {} id=[{}]>", self.name, self.id)
    }
}

/// Validated product attributes without an identifier. Used for both create
/// and full-replace update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

/// Raw request body. Every field is optional so a missing `name` can be
/// reported as a validation error rather than a parse error. Unknown keys,
/// including `id`, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
    pub category: Option<Category>,
}

impl ProductPayload {
    pub fn from_value(value: Value) -> Result<Self, ProductError> {
        if !value.is_object() {
            return Err(ProductError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| ProductError::BadAttribute(e.to_string()))
    }

    pub fn validate(self) -> Result<ProductDraft, ProductError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(ProductError::MissingField("name"))?;
        if name.chars().count() > NAME_MAX_LEN {
            return Err(ProductError::TooLong { field: "name", max: NAME_MAX_LEN });
        }

        let description = self.description.unwrap_or_default();
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(ProductError::TooLong { field: "description", max: DESCRIPTION_MAX_LEN });
        }

        let price = normalize_price(self.price.unwrap_or(Decimal::ZERO));
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ProductError::NegativePrice);
        }
        if price > max_price() {
            return Err(ProductError::PriceOutOfRange(max_price()));
        }

        Ok(ProductDraft {
            name,
            description,
            price,
            available: self.available.unwrap_or(true),
            category: self.category.unwrap_or_default(),
        })
    }
}

/// Round to cents and pin the scale so "12.5" and "12.50" serialize the same
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut p = price.round_dp(PRICE_SCALE);
    p.rescale(PRICE_SCALE);
    p
}

/// Row shape of the `products` table. Category is stored as its name.
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = ProductError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            available: row.available,
            category: row.category.parse()?,
        })
    }
}
