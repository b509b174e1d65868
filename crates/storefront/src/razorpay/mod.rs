//! Razorpay Orders API client and payment signature verification.
//!
//! # Architecture
//!
//! - `reqwest` client with basic auth (`key_id` / `key_secret`)
//! - Amounts cross the wire in integer minor units (paise for INR)
//! - Signature verification is local HMAC, no API call
//!
//! # Flow
//!
//! 1. Checkout creates a gateway order via [`RazorpayClient::create_order`]
//! 2. The browser completes payment in the hosted checkout widget
//! 3. The widget posts back `(order_id, payment_id, signature)`
//! 4. Confirmation verifies the signature via [`signature::verify_payment_signature`]

pub mod signature;
pub mod types;

pub use types::{GatewayOrder, PaymentCallback};

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::RazorpayConfig;

/// Errors that can occur when interacting with the Razorpay API.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The callback signature did not match.
    #[error("payment signature mismatch")]
    SignatureMismatch,

    /// The order amount cannot be represented in minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] hearthwood_core::PriceError),
}

/// Client for the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// The public key id, passed to the browser for the hosted widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for `amount_minor` minor units of `currency`.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::Api` if the gateway rejects the order,
    /// `RazorpayError::Http` on transport failures.
    #[instrument(skip(self), fields(amount_minor, currency))]
    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, RazorpayError> {
        let response = self
            .client
            .post(format!("{}/orders", self.api_base))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let order: GatewayOrder = response.json().await?;
        debug!(order_id = %order.id, "Created gateway order");
        Ok(order)
    }

    /// Fetch a gateway order by id.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::Api` on gateway errors, `RazorpayError::Http`
    /// on transport failures.
    #[instrument(skip(self))]
    pub async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, RazorpayError> {
        let response = self
            .client
            .get(format!("{}/orders/{order_id}", self.api_base))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Verify a hosted-widget payment callback against our key secret.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::SignatureMismatch` if the signature does not
    /// verify.
    pub fn verify_callback(&self, callback: &PaymentCallback) -> Result<(), RazorpayError> {
        signature::verify_payment_signature(
            &callback.razorpay_order_id,
            &callback.razorpay_payment_id,
            &callback.razorpay_signature,
            self.key_secret.expose_secret(),
        )
    }
}
