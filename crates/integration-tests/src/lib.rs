//! Integration tests for Hearthwood.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p hearthwood-cli -- migrate
//!
//! # Start the storefront, then run the ignored tests
//! cargo run -p hearthwood-storefront &
//! cargo test -p hearthwood-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server and
//! a seeded catalog. Each test file documents its extra requirements.

use reqwest::Client;

use hearthwood_storefront::middleware::session::SESSION_COOKIE_NAME;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so the session created by the
/// OAuth flow sticks for the rest of the test.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client_with_cookies() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// `Cookie` header value for a signed-in test session.
///
/// Tests that exercise auth-gated endpoints read the session cookie value
/// from `STOREFRONT_TEST_SESSION` (sign in through a browser and copy it).
///
/// # Panics
///
/// Panics if `STOREFRONT_TEST_SESSION` is not set.
#[must_use]
pub fn session_cookie_header() -> String {
    let value = std::env::var("STOREFRONT_TEST_SESSION")
        .expect("STOREFRONT_TEST_SESSION must hold a signed-in session cookie value");
    format!("{SESSION_COOKIE_NAME}={value}")
}
