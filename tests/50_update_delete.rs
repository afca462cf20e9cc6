mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{ProductFactory, TestServer, BASE_URL};

#[tokio::test]
async fn update_product() -> Result<()> {
    let server = TestServer::spawn().await?;
    let test_product = ProductFactory::build();

    let res = server.client.post(server.url(BASE_URL)).json(&test_product).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let mut new_product = res.json::<Value>().await?;
    let id = new_product["id"].as_i64().context("id not assigned")?;

    // Update it
    new_product["description"] = json!("foobar");
    let res = server.client.put(server.product_url(id)).json(&new_product).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["description"], "foobar");

    // Read it back
    let res = server.client.get(server.product_url(id)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = res.json::<Value>().await?;
    assert_eq!(fetched["description"], "foobar");
    assert_eq!(fetched["name"], test_product["name"]);
    Ok(())
}

#[tokio::test]
async fn update_ignores_body_id() -> Result<()> {
    let server = TestServer::spawn().await?;
    let mut product = server.create_products(1).await?.remove(0);
    let id = product["id"].as_i64().context("id not assigned")?;

    product["id"] = json!(id + 1000);
    let res = server.client.put(server.product_url(id)).json(&product).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["id"], id);
    Ok(())
}

#[tokio::test]
async fn update_product_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.put(server.product_url(0)).json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_product_with_invalid_body() -> Result<()> {
    let server = TestServer::spawn().await?;
    let product = server.create_products(1).await?.remove(0);
    let id = product["id"].as_i64().context("id not assigned")?;

    let res = server.client.put(server.product_url(id)).json(&json!({ "price": "1.00" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Stored product is untouched
    let res = server.client.get(server.product_url(id)).send().await?;
    assert_eq!(res.json::<Value>().await?["name"], product["name"]);
    Ok(())
}

#[tokio::test]
async fn update_product_wrong_content_type() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .put(server.product_url(1))
        .header(reqwest::header::CONTENT_TYPE, "text/html")
        .body("{}")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    Ok(())
}

#[tokio::test]
async fn delete_product() -> Result<()> {
    let server = TestServer::spawn().await?;
    let products = server.create_products(5).await?;
    let product_count = server.product_count().await?;
    let id = products[0]["id"].as_i64().context("id not assigned")?;

    let res = server.client.delete(server.product_url(id)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    // Make sure they are deleted
    let res = server.client.get(server.product_url(id)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.product_count().await?, product_count - 1);
    Ok(())
}

#[tokio::test]
async fn delete_missing_product() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.delete(server.product_url(0)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn method_not_allowed() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.put(server.url(BASE_URL)).json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
