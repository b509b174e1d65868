//! Product review and question route handlers.
//!
//! Nested under the product detail path, keyed by slug.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use hearthwood_core::ProductId;

use tracing::instrument;

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

const MAX_REVIEW_LENGTH: usize = 5000;
const MAX_QUESTION_LENGTH: usize = 1000;

/// Request body for writing a review.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub body: String,
}

/// Request body for asking a question.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

async fn resolve_product(state: &AppState, slug: &str) -> Result<ProductId, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(product.id)
}

/// A product's reviews, newest first.
///
/// # Route
///
/// `GET /api/products/{slug}/reviews`
#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let product_id = resolve_product(&state, &slug).await?;
    let reviews = ReviewRepository::new(state.pool())
        .list_reviews(product_id)
        .await?;

    Ok(Json(reviews).into_response())
}

/// Write or replace the signed-in user's review of a product.
///
/// # Route
///
/// `POST /api/products/{slug}/reviews`
#[instrument(skip(state, user, body))]
pub async fn create_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(slug): Path<String>,
    Json(body): Json<ReviewRequest>,
) -> Result<Response, AppError> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let text = body.body.trim();
    if text.is_empty() || text.len() > MAX_REVIEW_LENGTH {
        return Err(AppError::BadRequest("Invalid review body".to_string()));
    }

    let product_id = resolve_product(&state, &slug).await?;
    let review = ReviewRepository::new(state.pool())
        .upsert_review(product_id, user.id, body.rating, text)
        .await?;

    Ok((StatusCode::CREATED, Json(review)).into_response())
}

/// A product's questions, newest first.
///
/// # Route
///
/// `GET /api/products/{slug}/questions`
#[instrument(skip(state))]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let product_id = resolve_product(&state, &slug).await?;
    let questions = ReviewRepository::new(state.pool())
        .list_questions(product_id)
        .await?;

    Ok(Json(questions).into_response())
}

/// Ask a question about a product.
///
/// # Route
///
/// `POST /api/products/{slug}/questions`
#[instrument(skip(state, user, body))]
pub async fn create_question(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(slug): Path<String>,
    Json(body): Json<QuestionRequest>,
) -> Result<Response, AppError> {
    let text = body.question.trim();
    if text.is_empty() || text.len() > MAX_QUESTION_LENGTH {
        return Err(AppError::BadRequest("Invalid question".to_string()));
    }

    let product_id = resolve_product(&state, &slug).await?;
    let question = ReviewRepository::new(state.pool())
        .create_question(product_id, user.id, text)
        .await?;

    Ok((StatusCode::CREATED, Json(question)).into_response())
}
