use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers::{self, health, home, products};
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Build the full router: routes, fallbacks and global middleware
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(home::index).fallback(handlers::method_not_allowed))
        .route("/health", get(health::health).fallback(handlers::method_not_allowed))
        .merge(product_routes())
        .fallback(handlers::not_found)
        .layer(Extension(state))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    // Global middleware
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    if let Some(cors) = cors_layer(&config.security) {
        app = app.layer(cors);
    }

    app
}

fn product_routes() -> Router {
    Router::new()
        // Collection
        .route(
            products::BASE_PATH,
            get(products::list)
                .post(products::create)
                .fallback(handlers::method_not_allowed),
        )
        // Individual product
        .route(
            "/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete)
                .fallback(handlers::method_not_allowed),
        )
}
