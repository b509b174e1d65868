//! Support ticket and contact form route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use hearthwood_core::{Email, TicketId};

use tracing::instrument;

use crate::db::SupportRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

const MAX_SUBJECT_LENGTH: usize = 200;
const MAX_BODY_LENGTH: usize = 5000;

/// Request body for opening a ticket.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub body: String,
}

/// Request body for the public contact form.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// Open a support ticket.
///
/// # Route
///
/// `POST /api/tickets`
#[instrument(skip(state, user, body))]
pub async fn create_ticket(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateTicketRequest>,
) -> Result<Response, AppError> {
    let subject = body.subject.trim();
    let text = body.body.trim();

    if subject.is_empty() || subject.len() > MAX_SUBJECT_LENGTH {
        return Err(AppError::BadRequest("Invalid subject".to_string()));
    }
    if text.is_empty() || text.len() > MAX_BODY_LENGTH {
        return Err(AppError::BadRequest("Invalid message body".to_string()));
    }

    let ticket = SupportRepository::new(state.pool())
        .create_ticket(user.id, subject, text)
        .await?;

    tracing::info!(ticket_id = %ticket.id, "Support ticket opened");

    Ok((StatusCode::CREATED, Json(ticket)).into_response())
}

/// The signed-in user's tickets, newest first.
///
/// # Route
///
/// `GET /api/tickets`
#[instrument(skip(state, user))]
pub async fn list_tickets(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let tickets = SupportRepository::new(state.pool())
        .list_tickets(user.id)
        .await?;

    Ok(Json(tickets).into_response())
}

/// Ticket detail.
///
/// # Route
///
/// `GET /api/tickets/{id}`
#[instrument(skip(state, user))]
pub async fn ticket_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(ticket_id): Path<TicketId>,
) -> Result<Response, AppError> {
    let ticket = SupportRepository::new(state.pool())
        .get_ticket(user.id, ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ticket).into_response())
}

/// Submit the public contact form. No account required.
///
/// # Route
///
/// `POST /api/contact`
#[instrument(skip(state, body))]
pub async fn contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<Response, AppError> {
    let name = body.name.trim();
    let message = body.message.trim();

    if name.is_empty() || name.len() > 100 {
        return Err(AppError::BadRequest("Invalid name".to_string()));
    }
    if message.is_empty() || message.len() > MAX_BODY_LENGTH {
        return Err(AppError::BadRequest("Invalid message".to_string()));
    }

    let email = Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;

    let phone = body.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let inquiry = SupportRepository::new(state.pool())
        .create_inquiry(name, &email, phone, message)
        .await?;

    tracing::info!(inquiry_id = %inquiry.id, "Contact inquiry received");

    Ok((StatusCode::CREATED, Json(json!({ "id": inquiry.id }))).into_response())
}
