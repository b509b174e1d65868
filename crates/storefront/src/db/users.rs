//! User repository.
//!
//! Users are keyed by the identity provider's `sub` claim; there is no local
//! password storage. All queries use the runtime sqlx API with `FromRow`
//! models.

use sqlx::PgPool;

use hearthwood_core::UserId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

const USER_COLUMNS: &str = "id, subject, email, name, phone, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM storefront."user" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create or refresh a user from identity-provider claims.
    ///
    /// On repeat logins the email and name are refreshed from the provider
    /// (it is the source of truth for both).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken by a
    /// different subject, `RepositoryError::Database` for other failures.
    pub async fn upsert_from_claims(
        &self,
        subject: &str,
        email: &str,
        name: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO storefront."user" (subject, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject) DO UPDATE
                SET email = EXCLUDED.email,
                    name = COALESCE(EXCLUDED.name, "user".name),
                    updated_at = now()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(subject)
        .bind(email)
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already linked to another account"))?;

        Ok(user)
    }

    /// Update the user's phone number (collected at first checkout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_phone(&self, id: UserId, phone: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE storefront."user" SET phone = $1, updated_at = now() WHERE id = $2"#,
        )
        .bind(phone)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
