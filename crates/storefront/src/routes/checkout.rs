//! Checkout route handlers.
//!
//! Two-step flow for prepaid orders:
//!
//! 1. `POST /api/checkout` prices the lines server-side, creates a gateway
//!    order, and persists a `pending` local order. The response carries what
//!    the hosted checkout widget needs (`key_id`, gateway order id, amount).
//! 2. `POST /api/checkout/confirm` verifies the widget's payment signature
//!    and moves the order to `paid`.
//!
//! Cash-on-delivery orders skip the gateway and go straight to `processing`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use hearthwood_core::{CurrencyCode, PaymentMethod, Price, ProductId};

use tracing::instrument;

use crate::db::{CartRepository, OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{NewOrder, ShippingAddress};
use crate::razorpay::PaymentCallback;
use crate::services::checkout::{self, CheckoutError, PricedOrder};
use crate::state::AppState;

/// A single Buy Now line, bypassing the cart.
#[derive(Debug, Deserialize)]
pub struct DirectItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Request body for `POST /api/checkout`.
///
/// Without `item` the order is built from the persisted cart (which is then
/// emptied); with `item` it is a direct purchase and the cart is untouched.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    pub shipping: ShippingAddress,
    #[serde(default)]
    pub item: Option<DirectItem>,
}

/// Start a checkout.
///
/// # Route
///
/// `POST /api/checkout`
#[instrument(skip(state, user, body))]
pub async fn start(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CheckoutRequest>,
) -> Result<Response, AppError> {
    if !body.shipping.is_complete() {
        return Err(CheckoutError::IncompleteAddress.into());
    }

    let now = Utc::now();
    let from_cart = body.item.is_none();

    let priced: PricedOrder = match &body.item {
        Some(direct) => {
            let product = ProductRepository::new(state.pool())
                .get_by_id(direct.product_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
            checkout::price_direct(&product, direct.quantity, now)?
        }
        None => {
            let lines = CartRepository::new(state.pool()).list_lines(user.id).await?;
            checkout::price_cart(&lines, now)?
        }
    };

    let subtotal = priced.subtotal;
    let total = subtotal;

    let (razorpay_order_id, prepaid_amount) = match body.payment_method {
        PaymentMethod::Prepaid => {
            let price = Price::new(total, CurrencyCode::INR);
            let amount_minor = price
                .to_minor_units()
                .map_err(crate::razorpay::RazorpayError::InvalidAmount)?;

            let receipt = format!("hw-{}", Uuid::new_v4().simple());
            let gateway_order = state
                .razorpay()
                .create_order(amount_minor, CurrencyCode::INR.as_str(), &receipt)
                .await?;
            (Some(gateway_order.id), Some(amount_minor))
        }
        PaymentMethod::Cod => (None, None),
    };

    let new_order = NewOrder {
        payment_method: body.payment_method,
        razorpay_order_id,
        from_cart,
        subtotal,
        total,
        shipping: body.shipping,
        items: priced.items,
    };

    let order = OrderRepository::new(state.pool())
        .create(user.id, &new_order)
        .await?;

    tracing::info!(
        order_id = %order.order.id,
        payment_method = ?order.order.payment_method,
        from_cart,
        "Order created"
    );

    let payment = order
        .order
        .razorpay_order_id
        .as_ref()
        .zip(prepaid_amount)
        .map(|(gateway_id, amount_minor)| {
            json!({
                "key_id": state.razorpay().key_id(),
                "razorpay_order_id": gateway_id,
                "amount": amount_minor,
                "currency": CurrencyCode::INR.as_str(),
            })
        });

    Ok((
        StatusCode::CREATED,
        Json(json!({ "order": order, "payment": payment })),
    )
        .into_response())
}

/// Confirm a prepaid payment.
///
/// Verifies the hosted widget's signature and marks the order paid.
/// Replaying a confirmation for an already-paid order returns the order
/// unchanged.
///
/// # Route
///
/// `POST /api/checkout/confirm`
#[instrument(skip(state, user, callback))]
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(callback): Json<PaymentCallback>,
) -> Result<Response, AppError> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .find_by_gateway_order_id(user.id, &callback.razorpay_order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    state
        .razorpay()
        .verify_callback(&callback)
        .map_err(|_| AppError::BadRequest("Payment signature verification failed".to_string()))?;

    let updated = orders
        .mark_paid(order.id, &callback.razorpay_payment_id)
        .await?;

    let order = match updated {
        Some(order) => order,
        // Already paid (or cancelled); return the current row untouched
        None => orders
            .find_by_gateway_order_id(user.id, &callback.razorpay_order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?,
    };

    tracing::info!(order_id = %order.id, status = %order.status, "Payment confirmed");

    Ok(Json(order).into_response())
}
