//! Appointment booking route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use hearthwood_core::{AppointmentId, AppointmentKind};

use tracing::instrument;

use crate::db::AppointmentRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

const MAX_NOTES_LENGTH: usize = 2000;

/// Request body for booking an appointment.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub kind: AppointmentKind,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Book a showroom visit or design consultation.
///
/// # Route
///
/// `POST /api/appointments`
#[instrument(skip(state, user, body))]
pub async fn book(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<BookRequest>,
) -> Result<Response, AppError> {
    if body.scheduled_at <= Utc::now() {
        return Err(AppError::BadRequest(
            "Appointment time must be in the future".to_string(),
        ));
    }

    let notes = body.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if notes.is_some_and(|n| n.len() > MAX_NOTES_LENGTH) {
        return Err(AppError::BadRequest("Notes are too long".to_string()));
    }

    let appointment = AppointmentRepository::new(state.pool())
        .create(user.id, body.kind, body.scheduled_at, notes)
        .await?;

    tracing::info!(
        appointment_id = %appointment.id,
        kind = ?appointment.kind,
        "Appointment booked"
    );

    Ok((StatusCode::CREATED, Json(appointment)).into_response())
}

/// The signed-in user's appointments, soonest first.
///
/// # Route
///
/// `GET /api/appointments`
#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let appointments = AppointmentRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(appointments).into_response())
}

/// Cancel an appointment that hasn't completed.
///
/// # Route
///
/// `POST /api/appointments/{id}/cancel`
#[instrument(skip(state, user))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Response, AppError> {
    let repo = AppointmentRepository::new(state.pool());

    let Some(appointment) = repo.cancel(user.id, appointment_id).await? else {
        // Distinguish "not yours / missing" from "too late to cancel"
        return match repo.get(user.id, appointment_id).await? {
            Some(existing) => Err(AppError::Conflict(format!(
                "Appointment in status {} cannot be cancelled",
                existing.status
            ))),
            None => Err(AppError::NotFound("Appointment not found".to_string())),
        };
    };

    Ok(Json(appointment).into_response())
}
