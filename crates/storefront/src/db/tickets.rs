//! Support ticket and contact inquiry repository.

use sqlx::PgPool;

use hearthwood_core::{Email, TicketId, UserId};

use super::RepositoryError;
use crate::models::{ContactInquiry, SupportTicket};

const TICKET_COLUMNS: &str = "id, user_id, subject, body, status, created_at, updated_at";

/// Repository for support tickets and public contact inquiries.
pub struct SupportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupportRepository<'a> {
    /// Create a new support repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Open a new ticket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_ticket(
        &self,
        user_id: UserId,
        subject: &str,
        body: &str,
    ) -> Result<SupportTicket, RepositoryError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            INSERT INTO storefront.support_ticket (user_id, subject, body)
            VALUES ($1, $2, $3)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(subject)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        Ok(ticket)
    }

    /// List the user's tickets, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_tickets(&self, user_id: UserId) -> Result<Vec<SupportTicket>, RepositoryError> {
        let tickets = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM storefront.support_ticket
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tickets)
    }

    /// Get one of the user's tickets.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_ticket(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
    ) -> Result<Option<SupportTicket>, RepositoryError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM storefront.support_ticket
            WHERE id = $2 AND user_id = $1
            "#
        ))
        .bind(user_id)
        .bind(ticket_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(ticket)
    }

    /// Record a contact-form inquiry. No account required.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_inquiry(
        &self,
        name: &str,
        email: &Email,
        phone: Option<&str>,
        message: &str,
    ) -> Result<ContactInquiry, RepositoryError> {
        let inquiry = sqlx::query_as::<_, ContactInquiry>(
            r#"
            INSERT INTO storefront.contact_inquiry (name, email, phone, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, message, created_at
            "#,
        )
        .bind(name)
        .bind(email.as_str())
        .bind(phone)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        Ok(inquiry)
    }
}
