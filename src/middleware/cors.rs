use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::SecurityConfig;

/// Build the CORS layer from security config.
///
/// Returns `None` when CORS is disabled. A `*` entry allows any origin;
/// otherwise only the listed http(s) origins are allowed.
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(base.allow_origin(AllowOrigin::any()));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|o| o.starts_with("http://") || o.starts_with("https://"))
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    Some(base.allow_origin(AllowOrigin::list(origins)))
}
