mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::{assert_same_product, TestServer};

#[tokio::test]
async fn get_product() -> Result<()> {
    let server = TestServer::spawn().await?;
    let test_product = server.create_products(1).await?.remove(0);
    let id = test_product["id"].as_i64().unwrap_or_default();

    let res = server.client.get(server.product_url(id)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let data = res.json::<Value>().await?;
    assert_same_product(&data, &test_product);
    assert_eq!(data["id"], test_product["id"]);
    Ok(())
}

#[tokio::test]
async fn get_product_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.product_url(0)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let data = res.json::<Value>().await?;
    assert!(data["message"].as_str().unwrap_or_default().contains("was not found"), "{}", data);
    Ok(())
}

#[tokio::test]
async fn get_product_with_bad_id() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.url("/products/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_empty_catalog() -> Result<()> {
    let server = TestServer::spawn().await?;

    assert!(server.list(&[]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn get_product_list() -> Result<()> {
    let server = TestServer::spawn().await?;
    let created = server.create_products(5).await?;

    let data = server.list(&[]).await?;
    assert_eq!(data.len(), 5);

    let ids: Vec<_> = data.iter().map(|p| p["id"].clone()).collect();
    for product in &created {
        assert!(ids.contains(&product["id"]), "missing {} in listing", product["id"]);
    }
    Ok(())
}
