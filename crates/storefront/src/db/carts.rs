//! Cart repository.

use sqlx::PgPool;

use hearthwood_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartItem, CartLine};

const LINE_QUERY: &str = r#"
    SELECT ci.id, ci.product_id, ci.quantity,
           p.slug, p.name, p.image_url, p.price, p.deal_price, p.deal_ends_at, p.stock
    FROM storefront.cart_item ci
    JOIN storefront.product p ON p.id = ci.product_id
    WHERE ci.user_id = $1
    ORDER BY ci.created_at ASC, ci.id ASC
"#;

/// Repository for cart operations. All operations are scoped to a user.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the user's cart joined with current product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(LINE_QUERY)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(lines)
    }

    /// Add `quantity` of a product to the cart, summing with any existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO storefront.cart_item (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id) DO UPDATE
                SET quantity = storefront.cart_item.quantity + EXCLUDED.quantity,
                    updated_at = now()
            RETURNING id, user_id, product_id, quantity, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Set a cart line's quantity. Returns `None` if the line is not the user's.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE storefront.cart_item
            SET quantity = $3, updated_at = now()
            WHERE id = $2 AND user_id = $1
            RETURNING id, user_id, product_id, quantity, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Remove a cart line. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM storefront.cart_item WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.cart_item WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Merge a browser-local cart into the server cart.
    ///
    /// For each product the resulting quantity is the larger of the local and
    /// remote quantities, so replaying the merge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn merge(
        &self,
        user_id: UserId,
        entries: &[(ProductId, i32)],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for &(product_id, quantity) in entries {
            sqlx::query(
                r#"
                INSERT INTO storefront.cart_item (user_id, product_id, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, product_id) DO UPDATE
                    SET quantity = GREATEST(storefront.cart_item.quantity, EXCLUDED.quantity),
                        updated_at = now()
                "#,
            )
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
