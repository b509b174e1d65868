//! Cart models and API views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use hearthwood_core::{CartItemId, ProductId, UserId};

/// A bare cart row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row joined with its product, as the cart endpoints read it.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub deal_price: Option<Decimal>,
    pub deal_ends_at: Option<DateTime<Utc>>,
    pub stock: i32,
}

impl CartLine {
    /// Deal-aware unit price at `now`.
    #[must_use]
    pub fn unit_price(&self, now: DateTime<Utc>) -> Decimal {
        match (self.deal_price, self.deal_ends_at) {
            (Some(deal), Some(ends_at)) if now < ends_at => deal,
            _ => self.price,
        }
    }
}

/// One cart line as serialized by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub in_stock: bool,
}

/// The whole cart as serialized by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: Decimal,
    pub item_count: i64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }

    /// Build the cart view from joined lines, pricing at `now`.
    #[must_use]
    pub fn from_lines(lines: &[CartLine], now: DateTime<Utc>) -> Self {
        let items: Vec<CartLineView> = lines
            .iter()
            .map(|line| {
                let unit_price = line.unit_price(now);
                CartLineView {
                    id: line.id,
                    product_id: line.product_id,
                    slug: line.slug.clone(),
                    name: line.name.clone(),
                    image_url: line.image_url.clone(),
                    quantity: line.quantity,
                    unit_price,
                    line_total: unit_price * Decimal::from(line.quantity),
                    in_stock: line.stock > 0,
                }
            })
            .collect();

        let subtotal = items.iter().map(|i| i.line_total).sum();
        let item_count = items.iter().map(|i| i64::from(i.quantity)).sum();

        Self {
            items,
            subtotal,
            item_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn line(id: i32, quantity: i32, price: &str, deal: Option<(&str, Duration)>) -> CartLine {
        let now = Utc::now();
        CartLine {
            id: CartItemId::new(id),
            product_id: ProductId::new(id),
            quantity,
            slug: format!("product-{id}"),
            name: format!("Product {id}"),
            image_url: None,
            price: price.parse().expect("decimal"),
            deal_price: deal.map(|(p, _)| p.parse().expect("decimal")),
            deal_ends_at: deal.map(|(_, d)| now + d),
            stock: 5,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let now = Utc::now();
        let lines = vec![
            line(1, 2, "1000.00", None),
            line(2, 1, "500.00", Some(("400.00", Duration::hours(1)))),
        ];

        let view = CartView::from_lines(&lines, now);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "2400.00".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn test_cart_view_ignores_expired_deal() {
        let now = Utc::now();
        let lines = vec![line(1, 1, "500.00", Some(("400.00", Duration::hours(-1))))];

        let view = CartView::from_lines(&lines, now);
        assert_eq!(view.subtotal, "500.00".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn test_empty_cart() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, Decimal::ZERO);
        assert!(view.items.is_empty());
    }
}
