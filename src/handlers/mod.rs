pub mod health;
pub mod home;
pub mod products;

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// Router fallback for paths that match no route
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("{} was not found on this server", uri.path()))
}

/// Method fallback for known paths
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(format!("Method {} is not allowed on {}", method, uri.path()))
}
