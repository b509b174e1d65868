//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings Postgres)
//!
//! # Auth (identity provider OAuth)
//! GET  /auth/login             - Redirect to the provider's login page
//! GET  /auth/callback          - Handle OAuth callback, provision user
//! POST /auth/logout            - Clear the session
//! GET  /api/me                 - Current user profile
//! PUT  /api/me/phone           - Update phone number
//!
//! # Catalog (public)
//! GET  /api/products           - Product listing (?category=&q=&deals=)
//! GET  /api/products/{slug}    - Product detail
//! GET  /api/products/{slug}/reviews    - Reviews
//! POST /api/products/{slug}/reviews    - Write a review (auth)
//! GET  /api/products/{slug}/questions  - Questions
//! POST /api/products/{slug}/questions  - Ask a question (auth)
//!
//! # Cart (auth)
//! GET    /api/cart             - Current cart
//! DELETE /api/cart             - Empty the cart
//! POST   /api/cart/items       - Add a product
//! PUT    /api/cart/items/{id}  - Set line quantity
//! DELETE /api/cart/items/{id}  - Remove a line
//! POST   /api/cart/merge       - Merge a browser-local cart
//!
//! # Wishlist (auth)
//! GET    /api/wishlist
//! POST   /api/wishlist
//! DELETE /api/wishlist/{product_id}
//!
//! # Checkout and orders (auth)
//! POST /api/checkout           - Price lines, create gateway + local order
//! POST /api/checkout/confirm   - Verify payment signature, mark paid
//! GET  /api/orders             - Order history
//! GET  /api/orders/{id}        - Order detail with lines
//! POST /api/orders/{id}/cancel - Cancel before shipping
//!
//! # Appointments (auth)
//! GET  /api/appointments
//! POST /api/appointments
//! POST /api/appointments/{id}/cancel
//!
//! # Support
//! GET  /api/tickets            - Ticket list (auth)
//! POST /api/tickets            - Open a ticket (auth)
//! GET  /api/tickets/{id}       - Ticket detail (auth)
//! POST /api/contact            - Public contact form
//! ```

pub mod appointments;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod support;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/me/phone", put(auth::update_phone))
        // Catalog
        .route("/products", get(products::list))
        .route("/products/{slug}", get(products::detail))
        .route(
            "/products/{slug}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/products/{slug}/questions",
            get(reviews::list_questions).post(reviews::create_question),
        )
        // Cart
        .route("/cart", get(cart::get).delete(cart::clear))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/cart/merge", post(cart::merge))
        // Wishlist
        .route("/wishlist", get(wishlist::list).post(wishlist::add))
        .route("/wishlist/{product_id}", delete(wishlist::remove))
        // Checkout and orders
        .route("/checkout", post(checkout::start))
        .route("/checkout/confirm", post(checkout::confirm))
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::detail))
        .route("/orders/{id}/cancel", post(orders::cancel))
        // Appointments
        .route(
            "/appointments",
            get(appointments::list).post(appointments::book),
        )
        .route("/appointments/{id}/cancel", post(appointments::cancel))
        // Support
        .route(
            "/tickets",
            get(support::list_tickets).post(support::create_ticket),
        )
        .route("/tickets/{id}", get(support::ticket_detail))
}

/// Create the public contact-form router. Kept separate so it can carry a
/// stricter rate limit than the rest of the API.
pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(support::contact))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}
