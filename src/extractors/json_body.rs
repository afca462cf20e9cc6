//! JSON request body guarded by an exact media type check.
//!
//! axum's `Json` extractor accepts any `application/*+json` type and
//! answers with a plain-text rejection. Product writes must send
//! `application/json` and get the structured error body on failure.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
};
use serde_json::Value;

use crate::error::ApiError;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A request body that was sent as `application/json` and parsed as JSON
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

/// Require the Content-Type media type to equal `expected`.
/// Parameters such as `charset` are ignored.
pub fn check_content_type(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let Some(raw) = headers.get(header::CONTENT_TYPE) else {
        tracing::warn!("No Content-Type specified");
        return Err(ApiError::unsupported_media_type(format!("Content-Type must be {}", expected)));
    };

    let media_type = raw
        .to_str()
        .ok()
        .and_then(|s| s.split(';').next())
        .map(str::trim)
        .unwrap_or_default();

    if media_type.eq_ignore_ascii_case(expected) {
        return Ok(());
    }

    tracing::warn!("Invalid Content-Type: {:?}", raw);
    Err(ApiError::unsupported_media_type(format!("Content-Type must be {}", expected)))
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_content_type(req.headers(), JSON_MEDIA_TYPE)?;

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::payload_too_large("Request body is too large")
            } else {
                ApiError::bad_request(e.body_text())
            }
        })?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::invalid_json(format!("Malformed JSON body: {}", e)))?;
        Ok(JsonBody(value))
    }
}
