use std::str::FromStr;

use axum::{
    extract::Extension,
    http::{header, HeaderMap},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::database::ProductFilter;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, JsonBody, ProductId};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{product::normalize_price, Category, Product, ProductPayload};
use crate::state::AppState;

pub const BASE_PATH: &str = "/products";

/// Query string accepted by `GET /products`. Values are kept as raw strings
/// so that bad input is reported with the structured error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
    pub price: Option<String>,
}

impl TryFrom<ListQuery> for ProductFilter {
    type Error = ApiError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        let category = match query.category.as_deref() {
            Some(raw) => Some(Category::from_str(raw).map_err(|e| {
                warn!("Rejected category filter: {}", raw);
                ApiError::bad_request(e.to_string())
            })?),
            None => None,
        };

        let price = match query.price.as_deref() {
            Some(raw) => Some(parse_price(raw)?),
            None => None,
        };

        Ok(ProductFilter {
            name: query.name,
            category,
            available: query.available.as_deref().map(parse_availability),
            price,
        })
    }
}

/// `true`, `yes` and `1` (any case) mean available; anything else does not
fn parse_availability(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

/// Decimal price, optionally wrapped in double quotes
fn parse_price(raw: &str) -> Result<Decimal, ApiError> {
    let cleaned = raw.trim().trim_matches('"');
    Decimal::from_str(cleaned)
        .map(normalize_price)
        .map_err(|_| ApiError::bad_request(format!("Invalid price: {}", raw)))
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Product with id {} was not found", id))
}

/// Absolute URL of a product, built from the configured public URL or the
/// request Host header. Falls back to the bare path.
fn product_location(public_url: Option<&str>, headers: &HeaderMap, id: i64) -> String {
    let path = format!("{}/{}", BASE_PATH, id);
    let base = public_url.map(str::to_string).or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(|host| format!("http://{}", host))
    });

    base.and_then(|b| url::Url::parse(&format!("{}{}", b.trim_end_matches('/'), path)).ok())
        .map(String::from)
        .unwrap_or(path)
}

/// POST /products - Create a product
pub async fn create(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody,
) -> ApiResult<Product> {
    info!("Request to create a product");
    debug!("Processing: {}", body);

    let draft = ProductPayload::from_value(body)?.validate()?;
    let product = state.store.create(draft).await?;
    info!("Product with new id [{}] saved", product.id);

    let location = product_location(state.public_url.as_deref(), &headers, product.id);
    Ok(ApiResponse::created(product).with_location(location))
}

/// GET /products - List products, optionally filtered by name, category,
/// availability and price
pub async fn list(
    Extension(state): Extension<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Product>> {
    let filter = ProductFilter::try_from(query)?;
    debug!("Request to list products with {:?}", filter);

    let products = state.store.list(&filter).await?;
    debug!("Returning {} products", products.len());
    Ok(ApiResponse::success(products))
}

/// GET /products/:id - Read a single product
pub async fn get(Extension(state): Extension<AppState>, ProductId(id): ProductId) -> ApiResult<Product> {
    debug!("Request to fetch product with id [{}]", id);

    let product = state.store.find(id).await?.ok_or_else(|| not_found(id))?;

    debug!("Returning product with id [{}]", id);
    Ok(ApiResponse::success(product))
}

/// PUT /products/:id - Replace a product. The id in the path wins over any
/// id in the body.
pub async fn update(
    Extension(state): Extension<AppState>,
    ProductId(id): ProductId,
    JsonBody(body): JsonBody,
) -> ApiResult<Product> {
    info!("Request to update product with id [{}]", id);

    if state.store.find(id).await?.is_none() {
        return Err(not_found(id));
    }

    let draft = ProductPayload::from_value(body)?.validate()?;
    let product = state.store.update(id, draft).await?;

    info!("Product with id [{}] updated", id);
    Ok(ApiResponse::success(product))
}

/// DELETE /products/:id - Delete a product. Deleting a missing product
/// still answers 204.
pub async fn delete(Extension(state): Extension<AppState>, ProductId(id): ProductId) -> ApiResult<()> {
    info!("Request to delete product with id [{}]", id);

    if state.store.delete(id).await? {
        info!("Product with id [{}] deleted", id);
    } else {
        debug!("Product with id [{}] did not exist", id);
    }

    Ok(ApiResponse::no_content())
}
