//! Identity provider OAuth route handlers.
//!
//! Handles the authorization code flow:
//! - Login: Redirects to the provider's hosted login page
//! - Callback: Validates state, exchanges the code, provisions the local user
//! - Logout: Clears the session
//!
//! Customers land back on the SPA after the callback; errors are reported via
//! a `login_error` query parameter the SPA knows how to display.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Initiate sign-in.
///
/// Generates a CSRF state, stores it in the session, and redirects to the
/// provider's authorization page.
///
/// # Route
///
/// `GET /auth/login`
#[instrument(skip(state, session))]
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/?login_error=session").into_response();
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    let auth_url = state
        .identity()
        .authorization_url(&redirect_uri, &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code, fetches
/// the profile, upserts the local user row, and signs the session in.
///
/// # Route
///
/// `GET /auth/callback`
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("OAuth error from provider: {} - {}", error, description);
        return Redirect::to("/?login_error=denied").into_response();
    }

    let Some(code) = query.code else {
        tracing::warn!("OAuth callback missing code");
        return Redirect::to("/?login_error=missing_code").into_response();
    };

    let Some(returned_state) = query.state else {
        tracing::warn!("OAuth callback missing state");
        return Redirect::to("/?login_error=missing_state").into_response();
    };

    let stored_state: Option<String> = session.get(session_keys::OAUTH_STATE).await.ok().flatten();
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    if stored_state.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Redirect::to("/?login_error=state_mismatch").into_response();
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);

    let tokens = match state.identity().exchange_code(&code, &redirect_uri).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!("OAuth code exchange failed: {}", e);
            return Redirect::to("/?login_error=exchange_failed").into_response();
        }
    };

    let info = match state.identity().userinfo(&tokens.access_token).await {
        Ok(info) => info,
        Err(e) => {
            tracing::error!("Userinfo fetch failed: {}", e);
            return Redirect::to("/?login_error=profile_failed").into_response();
        }
    };

    let repo = UserRepository::new(state.pool());
    let user = match repo
        .upsert_from_claims(&info.sub, &info.email, info.name.as_deref())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("User provisioning failed: {}", e);
            return Redirect::to("/?login_error=provisioning").into_response();
        }
    };

    let current = CurrentUser {
        id: user.id,
        subject: user.subject.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
    };

    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!("Failed to store user in session: {}", e);
        return Redirect::to("/?login_error=session").into_response();
    }

    set_sentry_user(&user.id, Some(&user.email));
    tracing::info!(user_id = %user.id, "User signed in");

    Redirect::to("/").into_response()
}

/// Sign out and clear the session.
///
/// # Route
///
/// `POST /auth/logout`
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/").into_response())
}

/// The signed-in user's profile.
///
/// # Route
///
/// `GET /api/me`
#[instrument(skip(state, current))]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Response, AppError> {
    let repo = UserRepository::new(state.pool());
    let user = repo
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user).into_response())
}

/// Update the signed-in user's phone number.
///
/// # Route
///
/// `PUT /api/me/phone`
#[instrument(skip(state, current, body))]
pub async fn update_phone(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<UpdatePhoneRequest>,
) -> Result<Response, AppError> {
    let phone = body.phone.trim();
    if phone.is_empty() || phone.len() > 32 {
        return Err(AppError::BadRequest("Invalid phone number".to_string()));
    }

    let repo = UserRepository::new(state.pool());
    repo.set_phone(current.id, phone).await?;
    let user = repo
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user).into_response())
}

/// Request body for `PUT /api/me/phone`.
#[derive(Debug, Deserialize)]
pub struct UpdatePhoneRequest {
    pub phone: String,
}
