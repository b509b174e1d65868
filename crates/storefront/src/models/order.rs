//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hearthwood_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

/// A persisted order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub razorpay_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    /// Whether the order was placed from the persisted cart (vs. Buy Now).
    pub from_cart: bool,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub ship_name: String,
    pub ship_phone: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_postal_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line on a persisted order. Product name and unit price are denormalized
/// so later catalog edits don't rewrite order history.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Order with its items, as the detail endpoint serializes it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Shipping address supplied at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// Basic field-presence validation; detailed formats are the SPA's job.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !(self.name.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.address.trim().is_empty()
            || self.city.trim().is_empty()
            || self.postal_code.trim().is_empty())
    }
}

/// Input for persisting a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub payment_method: PaymentMethod,
    pub razorpay_order_id: Option<String>,
    pub from_cart: bool,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub shipping: ShippingAddress,
    pub items: Vec<NewOrderItem>,
}

/// One line of a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_address_complete() {
        let addr = ShippingAddress {
            name: "Asha Rao".to_string(),
            phone: "+91 98765 43210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
        };
        assert!(addr.is_complete());
    }

    #[test]
    fn test_shipping_address_blank_field() {
        let addr = ShippingAddress {
            name: "Asha Rao".to_string(),
            phone: "  ".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
        };
        assert!(!addr.is_complete());
    }
}
