//! OAuth/OIDC identity provider client.
//!
//! Hearthwood does not store passwords; sign-in is delegated to a hosted
//! identity provider (Auth0-style issuer) via the authorization code flow.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect the customer to the provider's login page
//! 3. The provider redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Fetch the profile with `userinfo()` and upsert the local user row

mod types;

pub use types::{TokenSet, UserInfo};

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::IdentityConfig;

/// Errors that can occur during the identity flow.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected an OAuth request.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The callback `state` did not match the session.
    #[error("state mismatch")]
    StateMismatch,
}

/// Client for the identity provider's OAuth endpoints.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    issuer_url: String,
    client_id: String,
    client_secret: String,
}

impl IdentityClient {
    /// Create a new identity client.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                issuer_url: config.issuer_url.clone(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.expose_secret().to_string(),
            }),
        }
    }

    /// Generate the authorization URL to redirect the customer to.
    ///
    /// `state` is a random string stored in the session to prevent CSRF.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20profile%20email&\
            state={}",
            self.inner.issuer_url,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens.
    ///
    /// `redirect_uri` must match the one used in the authorization request.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::OAuth` if the provider rejects the exchange.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, IdentityError> {
        let url = format!("{}/oauth/token", self.inner.issuer_url);

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &self.inner.client_id),
            ("client_secret", &self.inner.client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self.inner.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::OAuth(format!(
                "Token exchange failed: {text}"
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::OAuth` if the token is rejected.
    pub async fn userinfo(&self, access_token: &str) -> Result<UserInfo, IdentityError> {
        let url = format!("{}/userinfo", self.inner.issuer_url);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::OAuth(format!("Userinfo failed: {text}")));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> IdentityClient {
        IdentityClient::new(&IdentityConfig {
            issuer_url: "https://hearthwood.example.auth0.com".to_string(),
            client_id: "abc 123".to_string(),
            client_secret: SecretString::from("secret"),
        })
    }

    #[test]
    fn test_authorization_url_encodes_params() {
        let url = client().authorization_url("https://shop.example/auth/callback", "st/ate");
        assert!(url.starts_with("https://hearthwood.example.auth0.com/authorize?"));
        assert!(url.contains("client_id=abc%20123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fshop.example%2Fauth%2Fcallback"));
        assert!(url.contains("state=st%2Fate"));
        assert!(url.contains("scope=openid%20profile%20email"));
    }
}
