//! Session data types and keys.

use serde::{Deserialize, Serialize};

use hearthwood_core::UserId;

/// Session keys used by the storefront.
pub mod session_keys {
    /// The logged-in user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// One-time OAuth CSRF state for the identity provider flow.
    pub const OAUTH_STATE: &str = "oauth_state";
}

/// The logged-in user as stored in the session.
///
/// Kept small on purpose; anything else is read from the database per
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}
