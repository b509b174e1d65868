//! Integration tests for the public catalog API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p hearthwood-storefront)
//! - A seeded catalog (hw-cli seed catalog -f catalog.yaml)
//!
//! Run with: cargo test -p hearthwood-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;

use hearthwood_integration_tests::{client_with_cookies, storefront_base_url};

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_health_endpoints() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_product_listing() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert!(!products.is_empty(), "seeded catalog should not be empty");

    // Every product carries an effective price and stock flag
    for product in &products {
        assert!(product.get("effective_price").is_some());
        assert!(product.get("in_stock").is_some());
        assert!(product.get("slug").is_some());
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_product_detail_and_404() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let products: Vec<Value> = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse product list");

    let slug = products[0]["slug"].as_str().expect("slug is a string");

    let resp = client
        .get(format!("{base_url}/api/products/{slug}"))
        .send()
        .await
        .expect("Failed to get product detail");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/products/no-such-product"))
        .send()
        .await
        .expect("Failed to request missing product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body.get("error").is_some());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_deals_filter_only_returns_active_deals() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let deals: Vec<Value> = client
        .get(format!("{base_url}/api/products?deals=true"))
        .send()
        .await
        .expect("Failed to list deals")
        .json()
        .await
        .expect("Failed to parse deal list");

    for product in &deals {
        assert!(
            product.get("deal_price").is_some(),
            "deals filter returned a product without an active deal: {product}"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_cart_requires_auth() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to request cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Not signed in");
}
