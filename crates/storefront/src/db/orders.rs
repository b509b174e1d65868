//! Order repository.

use sqlx::PgPool;

use hearthwood_core::{OrderId, OrderStatus, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{NewOrder, Order, OrderItem, OrderWithItems};

const ORDER_COLUMNS: &str = "id, user_id, status, payment_method, razorpay_order_id, \
     razorpay_payment_id, from_cart, subtotal, total, ship_name, ship_phone, \
     ship_address, ship_city, ship_postal_code, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, unit_price, quantity";

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and its lines in one transaction.
    ///
    /// When `new_order.from_cart` is set the user's cart is emptied in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the gateway order id collides,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(
        &self,
        user_id: UserId,
        new_order: &NewOrder,
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let status = match new_order.payment_method {
            // Prepaid orders stay pending until the gateway confirms payment.
            hearthwood_core::PaymentMethod::Prepaid => OrderStatus::Pending,
            hearthwood_core::PaymentMethod::Cod => OrderStatus::Processing,
        };

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO storefront."order"
                (user_id, status, payment_method, razorpay_order_id, from_cart,
                 subtotal, total, ship_name, ship_phone, ship_address, ship_city,
                 ship_postal_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(status)
        .bind(new_order.payment_method)
        .bind(new_order.razorpay_order_id.as_deref())
        .bind(new_order.from_cart)
        .bind(new_order.subtotal)
        .bind(new_order.total)
        .bind(&new_order.shipping.name)
        .bind(&new_order.shipping.phone)
        .bind(&new_order.shipping.address)
        .bind(&new_order.shipping.city)
        .bind(&new_order.shipping.postal_code)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "gateway order already recorded"))?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for line in &new_order.items {
            let item = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO storefront.order_item
                    (order_id, product_id, product_name, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.unit_price)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        if new_order.from_cart {
            sqlx::query("DELETE FROM storefront.cart_item WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM storefront."order"
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get one of the user's orders with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let Some(order) = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM storefront."order"
            WHERE id = $2 AND user_id = $1
            "#
        ))
        .bind(user_id)
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM storefront.order_item WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems { order, items }))
    }

    /// Look up an order by its gateway order id, scoped to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_gateway_order_id(
        &self,
        user_id: UserId,
        razorpay_order_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM storefront."order"
            WHERE razorpay_order_id = $2 AND user_id = $1
            "#
        ))
        .bind(user_id)
        .bind(razorpay_order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Record a verified payment and move the order to `paid`.
    ///
    /// Only pending orders transition; replaying the confirmation on an
    /// already-paid order returns `None` and the caller re-reads the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_paid(
        &self,
        order_id: OrderId,
        razorpay_payment_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE storefront."order"
            SET status = 'paid', razorpay_payment_id = $2, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(razorpay_payment_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Cancel one of the user's orders if it hasn't shipped.
    ///
    /// Returns `None` when the order is missing, not the user's, or past the
    /// cancellable statuses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cancel(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE storefront."order"
            SET status = 'cancelled', updated_at = now()
            WHERE id = $2 AND user_id = $1 AND status IN ('pending', 'paid')
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }
}
