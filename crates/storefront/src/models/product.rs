//! Product catalog model and API view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use hearthwood_core::ProductId;

/// A catalog product as stored in Postgres.
///
/// `deal_price`/`deal_ends_at` are always set or cleared together (DB CHECK);
/// a deal applies only strictly before its expiry.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub material: Option<String>,
    pub price: Decimal,
    pub deal_price: Option<Decimal>,
    pub deal_ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The deal price, if the deal is still running at `now`.
    #[must_use]
    pub fn active_deal(&self, now: DateTime<Utc>) -> Option<Decimal> {
        match (self.deal_price, self.deal_ends_at) {
            (Some(price), Some(ends_at)) if now < ends_at => Some(price),
            _ => None,
        }
    }

    /// The price a customer is charged at `now` (deal-aware).
    #[must_use]
    pub fn effective_price(&self, now: DateTime<Utc>) -> Decimal {
        self.active_deal(now).unwrap_or(self.price)
    }

    /// Whether the product can currently be purchased.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Product as serialized by the API.
///
/// Deal fields are present only while the deal is active, so SPA clients
/// never have to re-check the expiry themselves.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub material: Option<String>,
    pub price: Decimal,
    pub effective_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

impl ProductView {
    /// Build the API view for a product at `now`.
    #[must_use]
    pub fn from_product(product: &Product, now: DateTime<Utc>) -> Self {
        let deal = product.active_deal(now);

        Self {
            id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            material: product.material.clone(),
            price: product.price,
            effective_price: product.effective_price(now),
            deal_price: deal,
            deal_ends_at: deal.is_some().then(|| product.deal_ends_at).flatten(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn product(deal_price: Option<&str>, deal_ends_in: Option<Duration>) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(1),
            slug: "walnut-coffee-table".to_string(),
            name: "Walnut Coffee Table".to_string(),
            description: String::new(),
            category: "tables".to_string(),
            material: Some("walnut".to_string()),
            price: "24999.00".parse().expect("decimal"),
            deal_price: deal_price.map(|p| p.parse().expect("decimal")),
            deal_ends_at: deal_ends_in.map(|d| now + d),
            image_url: None,
            stock: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_deal_before_expiry() {
        let p = product(Some("19999.00"), Some(Duration::hours(2)));
        let deal = p.active_deal(Utc::now());
        assert_eq!(deal, Some("19999.00".parse().expect("decimal")));
        assert_eq!(p.effective_price(Utc::now()), deal.expect("active"));
    }

    #[test]
    fn test_expired_deal_charges_regular_price() {
        let p = product(Some("19999.00"), Some(Duration::hours(-1)));
        assert_eq!(p.active_deal(Utc::now()), None);
        assert_eq!(p.effective_price(Utc::now()), p.price);
    }

    #[test]
    fn test_no_deal() {
        let p = product(None, None);
        assert_eq!(p.active_deal(Utc::now()), None);
        assert_eq!(p.effective_price(Utc::now()), p.price);
    }

    #[test]
    fn test_view_hides_expired_deal() {
        let p = product(Some("19999.00"), Some(Duration::minutes(-5)));
        let view = ProductView::from_product(&p, Utc::now());
        assert!(view.deal_price.is_none());
        assert!(view.deal_ends_at.is_none());
        assert_eq!(view.effective_price, p.price);
    }

    #[test]
    fn test_view_shows_active_deal() {
        let p = product(Some("19999.00"), Some(Duration::days(1)));
        let view = ProductView::from_product(&p, Utc::now());
        assert_eq!(view.deal_price, p.deal_price);
        assert!(view.deal_ends_at.is_some());
    }
}
