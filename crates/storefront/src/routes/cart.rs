//! Cart route handlers.
//!
//! The cart is server-side for signed-in users. Guests keep a cart in
//! browser storage; `merge` folds it into the server cart on sign-in.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use hearthwood_core::{CartItemId, ProductId};

use tracing::instrument;

use crate::db::{CartRepository, ProductRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{CartView, CurrentUser};
use crate::services::MergePlan;
use crate::services::checkout::MAX_LINE_QUANTITY;
use crate::state::AppState;

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Request body for updating a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// One entry of a browser-local cart posted at sign-in.
#[derive(Debug, Deserialize)]
pub struct MergeEntry {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Request body for merging a browser-local cart.
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub items: Vec<MergeEntry>,
}

fn check_quantity(quantity: i32) -> Result<(), AppError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(AppError::BadRequest(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

async fn cart_view(state: &AppState, user: &CurrentUser) -> Result<CartView, AppError> {
    let lines = CartRepository::new(state.pool()).list_lines(user.id).await?;
    Ok(CartView::from_lines(&lines, Utc::now()))
}

/// The signed-in user's cart.
///
/// # Route
///
/// `GET /api/cart`
#[instrument(skip(state, user))]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    Ok(Json(cart_view(&state, &user).await?).into_response())
}

/// Add a product to the cart.
///
/// Adding a product already in the cart sums the quantities.
///
/// # Route
///
/// `POST /api/cart/items`
#[instrument(skip(state, user))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<Response, AppError> {
    check_quantity(body.quantity)?;

    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if !product.in_stock() {
        return Err(AppError::Conflict("Product is out of stock".to_string()));
    }

    CartRepository::new(state.pool())
        .add_item(user.id, body.product_id, body.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(cart_view(&state, &user).await?)).into_response())
}

/// Set a cart line's quantity.
///
/// # Route
///
/// `PUT /api/cart/items/{id}`
#[instrument(skip(state, user))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Response, AppError> {
    check_quantity(body.quantity)?;

    CartRepository::new(state.pool())
        .set_quantity(user.id, item_id, body.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    Ok(Json(cart_view(&state, &user).await?).into_response())
}

/// Remove a cart line.
///
/// # Route
///
/// `DELETE /api/cart/items/{id}`
#[instrument(skip(state, user))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
) -> Result<Response, AppError> {
    let removed = CartRepository::new(state.pool())
        .remove_item(user.id, item_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    Ok(Json(cart_view(&state, &user).await?).into_response())
}

/// Empty the cart.
///
/// # Route
///
/// `DELETE /api/cart`
#[instrument(skip(state, user))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(Json(CartView::empty()).into_response())
}

/// Merge a browser-local cart into the server cart.
///
/// Per product the resulting quantity is the larger of the two carts, so the
/// client can safely replay the merge. Products that no longer exist are
/// skipped and reported back; products with exhausted stock are reported
/// separately and never enter the cart.
///
/// # Route
///
/// `POST /api/cart/merge`
#[instrument(skip(state, user, body))]
pub async fn merge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<MergeRequest>,
) -> Result<Response, AppError> {
    let posted: Vec<(ProductId, i32)> = body
        .items
        .iter()
        .map(|e| (e.product_id, e.quantity))
        .collect();

    let ids: Vec<ProductId> = posted.iter().map(|(id, _)| *id).collect();
    let stock = ProductRepository::new(state.pool()).stock_levels(&ids).await?;

    let plan = MergePlan::build(&posted, &stock);
    CartRepository::new(state.pool())
        .merge(user.id, &plan.entries)
        .await?;

    let cart = cart_view(&state, &user).await?;
    Ok(Json(json!({
        "cart": cart,
        "skipped": plan.skipped,
        "out_of_stock": plan.out_of_stock,
    }))
    .into_response())
}
