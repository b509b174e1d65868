//! Wishlist repository.

use sqlx::PgPool;

use hearthwood_core::{ProductId, UserId, WishlistItemId};

use super::RepositoryError;
use crate::models::Product;

/// Repository for wishlist operations, scoped to a user.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List wishlisted products, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self, user_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.slug, p.name, p.description, p.category, p.material,
                   p.price, p.deal_price, p.deal_ends_at, p.image_url, p.stock,
                   p.created_at, p.updated_at
            FROM storefront.wishlist_item wi
            JOIN storefront.product p ON p.id = wi.product_id
            WHERE wi.user_id = $1
            ORDER BY wi.created_at DESC, wi.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Save a product to the wishlist. Saving twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistItemId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO storefront.wishlist_item (user_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, product_id) DO UPDATE SET product_id = EXCLUDED.product_id
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(WishlistItemId::new(id))
    }

    /// Remove a product from the wishlist. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM storefront.wishlist_item WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
