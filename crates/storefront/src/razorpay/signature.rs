//! Payment signature verification.
//!
//! The hosted widget returns `hex(HMAC_SHA256("{order_id}|{payment_id}",
//! key_secret))`; we recompute it and compare in constant time via
//! `Mac::verify_slice`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::RazorpayError;

type HmacSha256 = Hmac<Sha256>;

/// Verify a payment callback signature.
///
/// # Errors
///
/// Returns `RazorpayError::SignatureMismatch` if `signature` is not valid hex
/// or does not match the expected HMAC.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> Result<(), RazorpayError> {
    let Ok(provided) = hex::decode(signature) else {
        return Err(RazorpayError::SignatureMismatch);
    };

    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .map_err(|_| RazorpayError::SignatureMismatch)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    mac.verify_slice(&provided)
        .map_err(|_| RazorpayError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_key_secret";

    fn sign(order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).expect("hmac key");
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_verifies() {
        let sig = sign("order_abc", "pay_xyz");
        assert!(verify_payment_signature("order_abc", "pay_xyz", &sig, SECRET).is_ok());
    }

    #[test]
    fn test_tampered_payment_id_rejected() {
        let sig = sign("order_abc", "pay_xyz");
        let result = verify_payment_signature("order_abc", "pay_other", &sig, SECRET);
        assert!(matches!(result, Err(RazorpayError::SignatureMismatch)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign("order_abc", "pay_xyz");
        let result = verify_payment_signature("order_abc", "pay_xyz", &sig, "other_secret");
        assert!(matches!(result, Err(RazorpayError::SignatureMismatch)));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let result = verify_payment_signature("order_abc", "pay_xyz", "not-hex!", SECRET);
        assert!(matches!(result, Err(RazorpayError::SignatureMismatch)));
    }
}
