#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use product_catalog::config::AppConfig;
use product_catalog::database::{MemoryProductStore, ProductStore};
use product_catalog::{build_app, AppState};

pub const BASE_URL: &str = "/products";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the real router over an in-memory store on a free port
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_store(Arc::new(MemoryProductStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn ProductStore>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        let app = build_app(AppState::new(store, None), &config);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, client: reqwest::Client::new(), handle };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn product_url(&self, id: i64) -> String {
        self.url(&format!("{}/{}", BASE_URL, id))
    }

    /// POST each product and return them with the ids the server assigned
    pub async fn create_products(&self, count: usize) -> Result<Vec<Value>> {
        let mut products = Vec::with_capacity(count);
        for _ in 0..count {
            let mut test_product = ProductFactory::build();
            let res = self.client.post(self.url(BASE_URL)).json(&test_product).send().await?;
            assert_eq!(res.status(), StatusCode::CREATED, "Could not create test product");
            let new_product = res.json::<Value>().await?;
            test_product["id"] = new_product["id"].clone();
            products.push(test_product);
        }
        Ok(products)
    }

    pub async fn list(&self, query: &[(&str, &str)]) -> Result<Vec<Value>> {
        let res = self.client.get(self.url(BASE_URL)).query(query).send().await?;
        assert_eq!(res.status(), StatusCode::OK, "list failed: {}", res.status());
        let data = res.json::<Value>().await?;
        Ok(data.as_array().cloned().context("list response is not an array")?)
    }

    pub async fn product_count(&self) -> Result<usize> {
        Ok(self.list(&[]).await?.len())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

const NAMES: &[&str] = &["Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Hammer"];
const CATEGORIES: &[&str] = &["UNKNOWN", "CLOTHS", "FOOD", "HOUSEWARES", "AUTOMOTIVE", "TOOLS"];
const ADJECTIVES: &[&str] = &["red", "sturdy", "fresh", "shiny", "old", "large"];

/// Builds product bodies with randomly chosen attributes
pub struct ProductFactory;

impl ProductFactory {
    pub fn build() -> Value {
        let mut rng = rand::rng();
        let name = NAMES.choose(&mut rng).copied().unwrap_or("Hat");
        let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("red");
        let cents: u32 = rng.random_range(100..100_000);
        json!({
            "name": name,
            "description": format!("A {} {}", adjective, name.to_lowercase()),
            "price": format!("{}.{:02}", cents / 100, cents % 100),
            "available": rng.random_bool(0.5),
            "category": CATEGORIES.choose(&mut rng).copied().unwrap_or("UNKNOWN"),
        })
    }
}

/// Compare the fields a client sent with what the server returned
pub fn assert_same_product(actual: &Value, expected: &Value) {
    assert_eq!(actual["name"], expected["name"]);
    assert_eq!(actual["description"], expected["description"]);
    assert_eq!(
        actual["price"].as_str().map(normalize_price),
        expected["price"].as_str().map(normalize_price),
        "price mismatch"
    );
    assert_eq!(actual["available"], expected["available"]);
    assert_eq!(actual["category"], expected["category"]);
}

fn normalize_price(s: &str) -> String {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    format!("{}.{:0<2}", whole, frac)
}
