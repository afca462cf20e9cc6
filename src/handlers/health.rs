use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

/// GET /health - Liveness check. Does not touch the store.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": StatusCode::OK.as_u16(),
            "message": "OK"
        })),
    )
}
