//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use hearthwood_core::ProductId;

use tracing::instrument;

use crate::db::{ProductRepository, WishlistRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::ProductView;
use crate::state::AppState;

/// Request body for saving a product.
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub product_id: ProductId,
}

/// The signed-in user's wishlist.
///
/// # Route
///
/// `GET /api/wishlist`
#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let products = WishlistRepository::new(state.pool())
        .list_products(user.id)
        .await?;

    let now = Utc::now();
    let views: Vec<ProductView> = products
        .iter()
        .map(|p| ProductView::from_product(p, now))
        .collect();

    Ok(Json(views).into_response())
}

/// Save a product to the wishlist. Saving twice is a no-op.
///
/// # Route
///
/// `POST /api/wishlist`
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddRequest>,
) -> Result<Response, AppError> {
    let products = ProductRepository::new(state.pool());
    if products.get_by_id(body.product_id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    WishlistRepository::new(state.pool())
        .add(user.id, body.product_id)
        .await?;

    Ok(StatusCode::CREATED.into_response())
}

/// Remove a product from the wishlist.
///
/// # Route
///
/// `DELETE /api/wishlist/{product_id}`
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Response, AppError> {
    let removed = WishlistRepository::new(state.pool())
        .remove(user.id, product_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound("Wishlist item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
