//! Integration tests for the prepaid checkout confirm flow.
//!
//! These tests require, on top of the usual running server and migrated
//! database:
//! - A seeded catalog with at least one in-stock product
//! - `STOREFRONT_TEST_SESSION`: the `hw_session` cookie value of a signed-in
//!   user (sign in through a browser and copy it)
//! - `RAZORPAY_KEY_SECRET`: the same key secret the server runs with, so the
//!   tests can produce valid payment signatures
//! - `RAZORPAY_API_BASE` pointing at the gateway's test environment
//!
//! Run with: cargo test -p hearthwood-integration-tests -- --ignored

use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode, header::COOKIE};
use serde_json::{Value, json};
use sha2::Sha256;
use uuid::Uuid;

use hearthwood_integration_tests::{
    client_with_cookies, session_cookie_header, storefront_base_url,
};

/// Sign `order_id|payment_id` the way the hosted widget does.
fn payment_signature(order_id: &str, payment_id: &str) -> String {
    let secret = std::env::var("RAZORPAY_KEY_SECRET")
        .expect("RAZORPAY_KEY_SECRET must match the running server");
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

async fn first_in_stock_product_id(client: &Client, base_url: &str) -> i64 {
    let products: Vec<Value> = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse product list");

    products
        .iter()
        .find(|p| p["in_stock"] == json!(true))
        .and_then(|p| p["id"].as_i64())
        .expect("Seeded catalog must contain an in-stock product")
}

/// Start a direct prepaid checkout and return (order json, payment json).
async fn start_prepaid_checkout(client: &Client, base_url: &str) -> (Value, Value) {
    let product_id = first_in_stock_product_id(client, base_url).await;

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .header(COOKIE, session_cookie_header())
        .json(&json!({
            "payment_method": "prepaid",
            "item": { "product_id": product_id, "quantity": 1 },
            "shipping": {
                "name": "Integration Test",
                "phone": "9999999999",
                "address": "12 Test Lane",
                "city": "Bengaluru",
                "postal_code": "560001"
            }
        }))
        .send()
        .await
        .expect("Failed to start checkout");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse checkout response");
    (body["order"].clone(), body["payment"].clone())
}

async fn fetch_order(client: &Client, base_url: &str, order_id: i64) -> Value {
    let resp = client
        .get(format!("{base_url}/api/orders/{order_id}"))
        .header(COOKIE, session_cookie_header())
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse order")
}

#[tokio::test]
#[ignore = "Requires running storefront server, signed-in session, and gateway test keys"]
async fn test_prepaid_checkout_reports_total_in_paise() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let (order, payment) = start_prepaid_checkout(&client, &base_url).await;

    let total: f64 = order["total"]
        .as_str()
        .expect("total serialized as string")
        .parse()
        .expect("total parses as a number");
    let amount = payment["amount"].as_i64().expect("amount in minor units");

    assert!(amount > 0);
    #[allow(clippy::cast_possible_truncation)]
    let expected = (total * 100.0).round() as i64;
    assert_eq!(amount, expected);
    assert_eq!(payment["currency"], json!("INR"));
}

#[tokio::test]
#[ignore = "Requires running storefront server, signed-in session, and gateway test keys"]
async fn test_invalid_signature_leaves_order_pending() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let (order, _payment) = start_prepaid_checkout(&client, &base_url).await;
    let order_id = order["id"].as_i64().expect("order id");
    let gateway_order_id = order["razorpay_order_id"]
        .as_str()
        .expect("prepaid order carries the gateway order id");

    let resp = client
        .post(format!("{base_url}/api/checkout/confirm"))
        .header(COOKIE, session_cookie_header())
        .json(&json!({
            "razorpay_order_id": gateway_order_id,
            "razorpay_payment_id": format!("pay_{}", Uuid::new_v4().simple()),
            "razorpay_signature": "deadbeef",
        }))
        .send()
        .await
        .expect("Failed to post confirm");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The failed confirmation must not have moved the order
    let current = fetch_order(&client, &base_url, order_id).await;
    assert_eq!(current["status"], json!("pending"));
    assert!(current.get("razorpay_payment_id").is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server, signed-in session, and gateway test keys"]
async fn test_confirm_replay_returns_paid_order_unchanged() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let (order, _payment) = start_prepaid_checkout(&client, &base_url).await;
    let order_id = order["id"].as_i64().expect("order id");
    let gateway_order_id = order["razorpay_order_id"]
        .as_str()
        .expect("prepaid order carries the gateway order id")
        .to_string();

    let payment_id = format!("pay_{}", Uuid::new_v4().simple());
    let callback = json!({
        "razorpay_order_id": gateway_order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": payment_signature(&gateway_order_id, &payment_id),
    });

    let resp = client
        .post(format!("{base_url}/api/checkout/confirm"))
        .header(COOKIE, session_cookie_header())
        .json(&callback)
        .send()
        .await
        .expect("Failed to post confirm");
    assert_eq!(resp.status(), StatusCode::OK);
    let confirmed: Value = resp.json().await.expect("Failed to parse confirm response");
    assert_eq!(confirmed["status"], json!("paid"));
    assert_eq!(confirmed["razorpay_payment_id"], json!(payment_id));

    // Replaying the same confirmation is accepted and changes nothing
    let resp = client
        .post(format!("{base_url}/api/checkout/confirm"))
        .header(COOKIE, session_cookie_header())
        .json(&callback)
        .send()
        .await
        .expect("Failed to replay confirm");
    assert_eq!(resp.status(), StatusCode::OK);
    let replayed: Value = resp.json().await.expect("Failed to parse replay response");
    assert_eq!(replayed["status"], json!("paid"));
    assert_eq!(replayed["razorpay_payment_id"], json!(payment_id));
    assert_eq!(replayed["updated_at"], confirmed["updated_at"]);

    let current = fetch_order(&client, &base_url, order_id).await;
    assert_eq!(current["status"], json!("paid"));
}
