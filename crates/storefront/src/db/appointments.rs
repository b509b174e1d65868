//! Appointment repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use hearthwood_core::{AppointmentId, AppointmentKind, UserId};

use super::RepositoryError;
use crate::models::Appointment;

const APPOINTMENT_COLUMNS: &str =
    "id, user_id, kind, status, scheduled_at, notes, created_at, updated_at";

/// Repository for showroom visit and design consultation bookings.
pub struct AppointmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AppointmentRepository<'a> {
    /// Create a new appointment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Book an appointment in the `requested` status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        kind: AppointmentKind,
        scheduled_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Appointment, RepositoryError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO storefront.appointment (user_id, kind, scheduled_at, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(kind)
        .bind(scheduled_at)
        .bind(notes)
        .fetch_one(self.pool)
        .await?;

        Ok(appointment)
    }

    /// List the user's appointments, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM storefront.appointment
            WHERE user_id = $1
            ORDER BY scheduled_at ASC, id ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(appointments)
    }

    /// Get one of the user's appointments.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        appointment_id: AppointmentId,
    ) -> Result<Option<Appointment>, RepositoryError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM storefront.appointment
            WHERE id = $2 AND user_id = $1
            "#
        ))
        .bind(user_id)
        .bind(appointment_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(appointment)
    }

    /// Cancel one of the user's appointments if it hasn't completed.
    ///
    /// Returns `None` when the appointment is missing, not the user's, or
    /// already completed/cancelled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cancel(
        &self,
        user_id: UserId,
        appointment_id: AppointmentId,
    ) -> Result<Option<Appointment>, RepositoryError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE storefront.appointment
            SET status = 'cancelled', updated_at = now()
            WHERE id = $2 AND user_id = $1 AND status IN ('requested', 'confirmed')
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(appointment_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(appointment)
    }
}
