//! Checkout order assembly.
//!
//! Turns a cart (or a single Buy Now line) into priced order lines. Prices
//! are resolved server-side at the moment of checkout, so an expired deal is
//! charged at the regular price no matter what the browser displayed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::error::AppError;
use crate::models::{CartLine, NewOrderItem, Product};

/// Per-line quantity limit. Bulk orders go through sales, not the cart.
pub const MAX_LINE_QUANTITY: i32 = 20;

/// Errors assembling an order at checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// A line's product has no stock.
    #[error("product out of stock: {0}")]
    OutOfStock(String),

    /// A line's quantity is outside `1..=MAX_LINE_QUANTITY`.
    #[error("invalid quantity {quantity} for {name}")]
    InvalidQuantity { name: String, quantity: i32 },

    /// The shipping address has blank fields.
    #[error("incomplete shipping address")]
    IncompleteAddress,
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::OutOfStock(_) => Self::Conflict(err.to_string()),
            CheckoutError::EmptyCart
            | CheckoutError::InvalidQuantity { .. }
            | CheckoutError::IncompleteAddress => Self::BadRequest(err.to_string()),
        }
    }
}

/// Priced order lines plus their subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub items: Vec<NewOrderItem>,
    pub subtotal: Decimal,
}

/// Price the user's cart lines into order lines at `now`.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart,
/// `CheckoutError::OutOfStock` / `CheckoutError::InvalidQuantity` for bad
/// lines.
pub fn price_cart(lines: &[CartLine], now: DateTime<Utc>) -> Result<PricedOrder, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        check_quantity(&line.name, line.quantity)?;
        if line.stock <= 0 {
            return Err(CheckoutError::OutOfStock(line.name.clone()));
        }

        items.push(NewOrderItem {
            product_id: line.product_id,
            product_name: line.name.clone(),
            unit_price: line.unit_price(now),
            quantity: line.quantity,
        });
    }

    Ok(finish(items))
}

/// Price a single Buy Now line at `now`.
///
/// # Errors
///
/// Returns `CheckoutError::OutOfStock` / `CheckoutError::InvalidQuantity`
/// for a bad line.
pub fn price_direct(
    product: &Product,
    quantity: i32,
    now: DateTime<Utc>,
) -> Result<PricedOrder, CheckoutError> {
    check_quantity(&product.name, quantity)?;
    if !product.in_stock() {
        return Err(CheckoutError::OutOfStock(product.name.clone()));
    }

    let items = vec![NewOrderItem {
        product_id: product.id,
        product_name: product.name.clone(),
        unit_price: product.effective_price(now),
        quantity,
    }];

    Ok(finish(items))
}

fn check_quantity(name: &str, quantity: i32) -> Result<(), CheckoutError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(CheckoutError::InvalidQuantity {
            name: name.to_string(),
            quantity,
        });
    }
    Ok(())
}

fn finish(items: Vec<NewOrderItem>) -> PricedOrder {
    let subtotal = items
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    PricedOrder { items, subtotal }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use hearthwood_core::{CartItemId, ProductId};

    fn line(id: i32, quantity: i32, price: &str, stock: i32) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            product_id: ProductId::new(id),
            quantity,
            slug: format!("product-{id}"),
            name: format!("Product {id}"),
            image_url: None,
            price: price.parse().expect("decimal"),
            deal_price: None,
            deal_ends_at: None,
            stock,
        }
    }

    fn product(id: i32, price: &str, deal: Option<(&str, Duration)>, stock: i32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            slug: format!("product-{id}"),
            name: format!("Product {id}"),
            description: String::new(),
            category: "sofas".to_string(),
            material: None,
            price: price.parse().expect("decimal"),
            deal_price: deal.map(|(p, _)| p.parse().expect("decimal")),
            deal_ends_at: deal.map(|(_, d)| now + d),
            image_url: None,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_price_cart_sums_lines() {
        let lines = vec![line(1, 2, "12000.00", 5), line(2, 1, "4500.00", 3)];
        let priced = price_cart(&lines, Utc::now()).expect("priced");
        assert_eq!(priced.items.len(), 2);
        assert_eq!(
            priced.subtotal,
            "28500.00".parse::<Decimal>().expect("decimal")
        );
    }

    #[test]
    fn test_price_cart_empty() {
        assert_eq!(price_cart(&[], Utc::now()), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_price_cart_out_of_stock() {
        let lines = vec![line(1, 1, "100.00", 0)];
        assert!(matches!(
            price_cart(&lines, Utc::now()),
            Err(CheckoutError::OutOfStock(_))
        ));
    }

    #[test]
    fn test_price_cart_rejects_oversized_quantity() {
        let lines = vec![line(1, MAX_LINE_QUANTITY + 1, "100.00", 50)];
        assert!(matches!(
            price_cart(&lines, Utc::now()),
            Err(CheckoutError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_price_direct_uses_active_deal() {
        let p = product(1, "5000.00", Some(("3999.00", Duration::hours(2))), 4);
        let priced = price_direct(&p, 2, Utc::now()).expect("priced");
        assert_eq!(
            priced.subtotal,
            "7998.00".parse::<Decimal>().expect("decimal")
        );
    }

    #[test]
    fn test_price_direct_ignores_expired_deal() {
        let p = product(1, "5000.00", Some(("3999.00", Duration::hours(-2))), 4);
        let priced = price_direct(&p, 1, Utc::now()).expect("priced");
        assert_eq!(
            priced.items[0].unit_price,
            "5000.00".parse::<Decimal>().expect("decimal")
        );
    }

    #[test]
    fn test_price_direct_out_of_stock() {
        let p = product(1, "5000.00", None, 0);
        assert!(matches!(
            price_direct(&p, 1, Utc::now()),
            Err(CheckoutError::OutOfStock(_))
        ));
    }
}
