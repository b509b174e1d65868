//! Storefront user model.
//!
//! Users are provisioned on first login from the identity provider's
//! userinfo claims; there are no local credentials.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use hearthwood_core::UserId;

/// A storefront user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    /// The identity provider's stable `sub` claim.
    #[serde(skip_serializing)]
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
