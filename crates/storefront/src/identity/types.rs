//! Wire types for the identity provider.

use serde::Deserialize;

/// Tokens returned by the provider's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// The profile claims from the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Stable subject identifier, the key local users are provisioned under.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_userinfo_minimal() {
        let json = r#"{"sub": "auth0|123", "email": "asha@example.com"}"#;
        let info: UserInfo = serde_json::from_str(json).expect("valid userinfo");
        assert_eq!(info.sub, "auth0|123");
        assert!(info.name.is_none());
    }

    #[test]
    fn test_token_set_without_refresh() {
        let json = r#"{"access_token": "at", "expires_in": 86400}"#;
        let tokens: TokenSet = serde_json::from_str(json).expect("valid token set");
        assert_eq!(tokens.access_token, "at");
        assert!(tokens.refresh_token.is_none());
    }
}
