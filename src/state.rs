use std::sync::Arc;

use crate::database::ProductStore;

/// Shared handler state, injected as a request extension
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    /// Base URL for `Location` headers, e.g. `https://catalog.example.com`
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, public_url: Option<String>) -> Self {
        Self { store, public_url }
    }
}
