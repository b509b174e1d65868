//! Integration tests for the contact form and auth-gated support endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p hearthwood-storefront)
//!
//! Run with: cargo test -p hearthwood-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use hearthwood_integration_tests::{
    client_with_cookies, session_cookie_header, storefront_base_url,
};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_contact_form_accepts_valid_inquiry() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    // Unique email so reruns don't look like duplicates in the inbox
    let email = format!("it-{}@example.com", Uuid::new_v4().simple());

    let resp = client
        .post(format!("{base_url}/api/contact"))
        .json(&json!({
            "name": "Integration Test",
            "email": email,
            "message": "Do you deliver to Pune?",
        }))
        .send()
        .await
        .expect("Failed to submit contact form");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body.get("id").is_some());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_contact_form_rejects_bad_email() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/contact"))
        .json(&json!({
            "name": "Integration Test",
            "email": "not-an-email",
            "message": "Hello",
        }))
        .send()
        .await
        .expect("Failed to submit contact form");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_tickets_require_auth() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/tickets"))
        .json(&json!({ "subject": "Damaged leg", "body": "The left leg arrived cracked." }))
        .send()
        .await
        .expect("Failed to post ticket");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{base_url}/api/appointments"))
        .send()
        .await
        .expect("Failed to list appointments");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and signed-in session"]
async fn test_cancelled_appointment_cancel_returns_conflict() {
    use chrono::{Duration, Utc};
    use reqwest::header::COOKIE;

    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/appointments"))
        .header(COOKIE, session_cookie_header())
        .json(&json!({
            "kind": "showroom_visit",
            "scheduled_at": (Utc::now() + Duration::days(3)).to_rfc3339(),
        }))
        .send()
        .await
        .expect("Failed to book appointment");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let appointment: Value = resp.json().await.expect("Failed to parse appointment");
    let id = appointment["id"].as_i64().expect("appointment id");

    let resp = client
        .post(format!("{base_url}/api/appointments/{id}/cancel"))
        .header(COOKIE, session_cookie_header())
        .send()
        .await
        .expect("Failed to cancel appointment");
    assert_eq!(resp.status(), StatusCode::OK);

    // A second cancel finds the appointment past its cancellable statuses
    let resp = client
        .post(format!("{base_url}/api/appointments/{id}/cancel"))
        .header(COOKIE, session_cookie_header())
        .send()
        .await
        .expect("Failed to re-cancel appointment");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_checkout_requires_auth() {
    let client = client_with_cookies();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .json(&json!({
            "payment_method": "cod",
            "shipping": {
                "name": "A", "phone": "1", "address": "B", "city": "C", "postal_code": "560001"
            }
        }))
        .send()
        .await
        .expect("Failed to post checkout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
