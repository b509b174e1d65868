//! Product review and question repository.

use sqlx::PgPool;

use hearthwood_core::{ProductId, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{ProductQuestion, ProductReview};

/// Repository for product reviews and questions.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a product's reviews with author names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_reviews(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductReview>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ProductReview>(
            r#"
            SELECT r.id, r.product_id, r.user_id, u.name AS author_name,
                   r.rating, r.body, r.created_at
            FROM storefront.product_review r
            JOIN storefront."user" u ON u.id = r.user_id
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Write or replace the user's review of a product.
    ///
    /// One review per user per product; a second submission overwrites the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on constraint violations,
    /// `RepositoryError::Database` for other failures.
    pub async fn upsert_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
        rating: i32,
        body: &str,
    ) -> Result<ProductReview, RepositoryError> {
        let review = sqlx::query_as::<_, ProductReview>(
            r#"
            WITH upserted AS (
                INSERT INTO storefront.product_review (product_id, user_id, rating, body)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (product_id, user_id) DO UPDATE
                    SET rating = EXCLUDED.rating, body = EXCLUDED.body
                RETURNING id, product_id, user_id, rating, body, created_at
            )
            SELECT r.id, r.product_id, r.user_id, u.name AS author_name,
                   r.rating, r.body, r.created_at
            FROM upserted r
            JOIN storefront."user" u ON u.id = r.user_id
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(body)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "review already exists"))?;

        Ok(review)
    }

    /// List a product's questions with asker names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_questions(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductQuestion>, RepositoryError> {
        let questions = sqlx::query_as::<_, ProductQuestion>(
            r#"
            SELECT q.id, q.product_id, q.user_id, u.name AS author_name,
                   q.question, q.answer, q.created_at, q.answered_at
            FROM storefront.product_question q
            JOIN storefront."user" u ON u.id = q.user_id
            WHERE q.product_id = $1
            ORDER BY q.created_at DESC, q.id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(questions)
    }

    /// Ask a question about a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_question(
        &self,
        product_id: ProductId,
        user_id: UserId,
        question: &str,
    ) -> Result<ProductQuestion, RepositoryError> {
        let question = sqlx::query_as::<_, ProductQuestion>(
            r#"
            WITH inserted AS (
                INSERT INTO storefront.product_question (product_id, user_id, question)
                VALUES ($1, $2, $3)
                RETURNING id, product_id, user_id, question, answer, created_at, answered_at
            )
            SELECT q.id, q.product_id, q.user_id, u.name AS author_name,
                   q.question, q.answer, q.created_at, q.answered_at
            FROM inserted q
            JOIN storefront."user" u ON u.id = q.user_id
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(question)
        .fetch_one(self.pool)
        .await?;

        Ok(question)
    }
}
