pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use app::build_app;
pub use state::AppState;
