//! Product catalog repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use hearthwood_core::ProductId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, slug, name, description, category, material, price, \
     deal_price, deal_ends_at, image_url, stock, created_at, updated_at";

/// Catalog list filters. All optional; combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring match on name/description.
    pub query: Option<String>,
    /// Only products with a currently-active deal.
    pub deals_only: bool,
}

impl ProductFilter {
    /// Cache key for the catalog cache. Stable across equal filters.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "category={};q={};deals={}",
            self.category.as_deref().unwrap_or(""),
            self.query.as_deref().unwrap_or(""),
            self.deals_only
        )
    }
}

/// Input for seeding/updating a catalog product.
#[derive(Debug, Clone)]
pub struct ProductSeed {
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
}

/// Repository for product catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM storefront.product
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%'
                                    OR description ILIKE '%' || $2 || '%')
              AND (NOT $3 OR (deal_price IS NOT NULL AND deal_ends_at > now()))
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(filter.query.as_deref())
        .bind(filter.deals_only)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Stock levels for the given product ids.
    ///
    /// Used by cart migration: an id missing from the map no longer exists
    /// (stale browser cache), a zero stock level means the product cannot be
    /// carted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock_levels(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, i32>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let rows: Vec<(i32, i32)> =
            sqlx::query_as("SELECT id, stock FROM storefront.product WHERE id = ANY($1)")
                .bind(&raw)
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, stock)| (ProductId::new(id), stock))
            .collect())
    }

    /// Insert or update a product by slug (catalog seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on constraint violations,
    /// `RepositoryError::Database` for other failures.
    pub async fn upsert(&self, seed: &ProductSeed) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO storefront.product
                (slug, name, description, category, material, price,
                 deal_price, deal_ends_at, image_url, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (slug) DO UPDATE
                SET name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    category = EXCLUDED.category,
                    material = EXCLUDED.material,
                    price = EXCLUDED.price,
                    deal_price = EXCLUDED.deal_price,
                    deal_ends_at = EXCLUDED.deal_ends_at,
                    image_url = EXCLUDED.image_url,
                    stock = EXCLUDED.stock,
                    updated_at = now()
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&seed.slug)
        .bind(&seed.name)
        .bind(&seed.description)
        .bind(&seed.category)
        .bind(seed.material.as_deref())
        .bind(seed.price)
        .bind(seed.deal_price)
        .bind(seed.deal_ends_at)
        .bind(seed.image_url.as_deref())
        .bind(seed.stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "product slug already exists"))?;

        Ok(product)
    }

    /// Delete every product (seed `--replace`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.product")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_cache_key_stable() {
        let a = ProductFilter {
            category: Some("sofas".to_string()),
            query: None,
            deals_only: true,
        };
        let b = a.clone();
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_filter_cache_key_distinguishes() {
        let base = ProductFilter::default();
        let with_q = ProductFilter {
            query: Some("oak".to_string()),
            ..ProductFilter::default()
        };
        assert_ne!(base.cache_key(), with_q.cache_key());
    }
}
