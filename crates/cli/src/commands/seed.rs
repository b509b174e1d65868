//! Catalog seeding from YAML.
//!
//! Reads a product catalog file and upserts it by slug, so re-running the
//! seed refreshes prices and stock without duplicating rows.
//!
//! # File format
//!
//! ```yaml
//! products:
//!   - slug: walnut-coffee-table
//!     name: Walnut Coffee Table
//!     description: Solid walnut, hand finished.
//!     category: tables
//!     material: walnut
//!     price: "24999.00"
//!     deal_price: "19999.00"          # optional, requires deal_ends_at
//!     deal_ends_at: 2026-09-15T00:00:00Z
//!     image_url: https://cdn.hearthwood.shop/walnut-coffee-table.jpg
//!     stock: 12
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use hearthwood_storefront::db::products::{ProductRepository, ProductSeed};

/// The catalog file root.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<CatalogEntry>,
}

/// One product entry in the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    slug: String,
    name: String,
    description: String,
    category: String,
    #[serde(default)]
    material: Option<String>,
    price: Decimal,
    #[serde(default)]
    deal_price: Option<Decimal>,
    #[serde(default)]
    deal_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    image_url: Option<String>,
    stock: i32,
}

impl CatalogEntry {
    /// Validate the entry; returns a description of the problem if invalid.
    fn validate(&self) -> Option<String> {
        if self.slug.trim().is_empty() || self.name.trim().is_empty() {
            return Some("slug and name must be non-empty".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Some(format!("price must be positive, got {}", self.price));
        }
        if self.stock < 0 {
            return Some(format!("stock must be non-negative, got {}", self.stock));
        }
        match (self.deal_price, self.deal_ends_at) {
            (Some(deal), Some(_)) if deal >= self.price => {
                Some(format!("deal_price {deal} is not below price {}", self.price))
            }
            (Some(_), None) | (None, Some(_)) => {
                Some("deal_price and deal_ends_at must be set together".to_string())
            }
            _ => None,
        }
    }

    fn into_seed(self) -> ProductSeed {
        ProductSeed {
            slug: self.slug,
            name: self.name,
            description: self.description,
            category: self.category,
            material: self.material,
            price: self.price,
            deal_price: self.deal_price,
            deal_ends_at: self.deal_ends_at,
            image_url: self.image_url,
            stock: self.stock,
        }
    }
}

/// Seed the product catalog from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the catalog YAML file
/// * `replace` - If true, delete all existing products first
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, or if database
/// operations fail.
pub async fn catalog(file_path: &str, replace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate the YAML before touching the database
    let content = tokio::fs::read_to_string(path).await?;
    let file: CatalogFile = serde_yaml::from_str(&content)?;

    let mut errors = Vec::new();
    for entry in &file.products {
        if let Some(problem) = entry.validate() {
            errors.push(format!("{}: {problem}", entry.slug));
        }
    }
    if !errors.is_empty() {
        for e in &errors {
            warn!("Invalid catalog entry: {e}");
        }
        return Err(format!("{} invalid catalog entries", errors.len()).into());
    }

    info!(products = file.products.len(), "Parsed catalog");

    let pool = hearthwood_storefront::db::create_pool(&database_url).await?;
    let repo = ProductRepository::new(&pool);

    if replace {
        let deleted = repo.delete_all().await?;
        info!(deleted, "Cleared existing catalog");
    }

    let mut seeded = 0usize;
    for entry in file.products {
        let seed = entry.into_seed();
        repo.upsert(&seed).await?;
        seeded += 1;
    }

    info!(seeded, "Catalog seed complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(yaml: &str) -> CatalogEntry {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    #[test]
    fn test_valid_entry() {
        let e = entry(
            r"
            slug: oak-bookshelf
            name: Oak Bookshelf
            description: Five shelves.
            category: storage
            price: '15999.00'
            stock: 4
            ",
        );
        assert!(e.validate().is_none());
    }

    #[test]
    fn test_deal_without_expiry_rejected() {
        let e = entry(
            r"
            slug: oak-bookshelf
            name: Oak Bookshelf
            description: Five shelves.
            category: storage
            price: '15999.00'
            deal_price: '12999.00'
            stock: 4
            ",
        );
        assert!(e.validate().is_some());
    }

    #[test]
    fn test_deal_above_price_rejected() {
        let e = entry(
            r"
            slug: oak-bookshelf
            name: Oak Bookshelf
            description: Five shelves.
            category: storage
            price: '15999.00'
            deal_price: '16999.00'
            deal_ends_at: 2026-09-15T00:00:00Z
            stock: 4
            ",
        );
        assert!(e.validate().is_some());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let e = entry(
            r"
            slug: oak-bookshelf
            name: Oak Bookshelf
            description: Five shelves.
            category: storage
            price: '15999.00'
            stock: -1
            ",
        );
        assert!(e.validate().is_some());
    }
}
