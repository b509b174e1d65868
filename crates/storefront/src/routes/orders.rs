//! Order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use hearthwood_core::OrderId;

use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// The signed-in user's orders, newest first.
///
/// # Route
///
/// `GET /api/orders`
#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders).into_response())
}

/// Order detail with lines.
///
/// Another user's order id returns 404, never 403; the response must not
/// reveal that the id exists.
///
/// # Route
///
/// `GET /api/orders/{id}`
#[instrument(skip(state, user))]
pub async fn detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Response, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_with_items(user.id, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(order).into_response())
}

/// Cancel an order that hasn't shipped.
///
/// # Route
///
/// `POST /api/orders/{id}/cancel`
#[instrument(skip(state, user))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Response, AppError> {
    let repo = OrderRepository::new(state.pool());

    let Some(order) = repo.cancel(user.id, order_id).await? else {
        // Distinguish "not yours / missing" from "too late to cancel"
        return match repo.get_with_items(user.id, order_id).await? {
            Some(existing) => Err(AppError::Conflict(format!(
                "Order in status {} cannot be cancelled",
                existing.order.status
            ))),
            None => Err(AppError::NotFound("Order not found".to_string())),
        };
    };

    tracing::info!(order_id = %order.id, "Order cancelled");

    Ok(Json(order).into_response())
}
