//! Health check handlers for the orchestrator.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

/// Liveness probe. Always succeeds while the process is up.
///
/// # Route
///
/// `GET /health`
pub async fn liveness() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// Readiness probe. Fails when Postgres is unreachable so the orchestrator
/// stops routing traffic here.
///
/// # Route
///
/// `GET /health/ready`
pub async fn readiness(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => Json(json!({ "status": "ready" })).into_response(),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}
