//! Wire types for the Razorpay Orders API.

use serde::{Deserialize, Serialize};

/// An order as the gateway returns it.
///
/// Amounts are integer minor units (paise for INR).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id, e.g. `order_IluGWxBm9U8zJ8`.
    pub id: String,
    pub amount: i64,
    pub amount_paid: i64,
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    /// `created`, `attempted`, or `paid`.
    pub status: String,
}

/// The fields the hosted checkout widget posts back after payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_order_deserializes() {
        let json = r#"{
            "id": "order_IluGWxBm9U8zJ8",
            "amount": 500000,
            "amount_paid": 0,
            "amount_due": 500000,
            "currency": "INR",
            "receipt": "hw-42",
            "status": "created"
        }"#;

        let order: GatewayOrder = serde_json::from_str(json).expect("valid order");
        assert_eq!(order.id, "order_IluGWxBm9U8zJ8");
        assert_eq!(order.amount, 500_000);
        assert_eq!(order.status, "created");
    }

    #[test]
    fn test_gateway_order_missing_receipt() {
        let json = r#"{
            "id": "order_x",
            "amount": 100,
            "amount_paid": 0,
            "amount_due": 100,
            "currency": "INR",
            "status": "created"
        }"#;

        let order: GatewayOrder = serde_json::from_str(json).expect("valid order");
        assert!(order.receipt.is_none());
    }
}
