//! Appointments, support tickets, contact inquiries, reviews, and questions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use hearthwood_core::{
    AppointmentId, AppointmentKind, AppointmentStatus, InquiryId, ProductId, QuestionId, ReviewId,
    TicketId, TicketStatus, UserId,
};

/// A showroom visit or design consultation booking.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer support ticket.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupportTicket {
    pub id: TicketId,
    pub user_id: UserId,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A public contact-form inquiry (no account required).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactInquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A product review, joined with the reviewer's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductReview {
    pub id: ReviewId,
    pub product_id: ProductId,
    #[serde(skip_serializing)]
    pub user_id: UserId,
    pub author_name: Option<String>,
    pub rating: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A product question, joined with the asker's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductQuestion {
    pub id: QuestionId,
    pub product_id: ProductId,
    #[serde(skip_serializing)]
    pub user_id: UserId,
    pub author_name: Option<String>,
    pub question: String,
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}
