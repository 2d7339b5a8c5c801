//! # Order Repository
//!
//! Read and reschedule operations for committed orders.
//!
//! ## Key Operations
//! - Slot occupancy counts (feeds the delivery scheduler)
//! - Order history for a user
//! - Rescheduling deliveries (store-wide delivery suspension)
//! - Raw aggregates for the operator (revenue, buyers, top sellers)
//!
//! ## Order Writes
//! Order INSERTS happen only inside [`crate::repository::checkout`] so
//! the order, its lines, the stock decrements and the credit debit land
//! in one transaction.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bodega_core::{Order, OrderLine};

/// Row shape for the top-sellers aggregate.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue_cents: i64,
}

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Fetches an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, subtotal_cents, credit_applied_cents,
                   total_cents, delivery_at, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        order.ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Fetches the lines of an order.
    pub async fn lines_for(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id, quantity, unit_price_cents
            FROM order_lines
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, subtotal_cents, credit_applied_cents,
                   total_cents, delivery_at, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders delivering inside `[start, end)`.
    ///
    /// ## Usage
    /// Slot capacity check: the scheduler compares this count against the
    /// policy's per-window capacity.
    pub async fn count_deliveries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE delivery_at >= ?1 AND delivery_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Lists orders whose delivery falls inside `[start, end)`.
    ///
    /// ## Usage
    /// Store-wide delivery suspension: these are the orders that need
    /// rescheduling and a notice.
    pub async fn orders_delivering_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, subtotal_cents, credit_applied_cents,
                   total_cents, delivery_at, created_at
            FROM orders
            WHERE delivery_at >= ?1 AND delivery_at < ?2
            ORDER BY delivery_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Moves an order's delivery to a new moment.
    pub async fn reschedule_delivery(
        &self,
        order_id: &str,
        delivery_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET delivery_at = ?2 WHERE id = ?1")
            .bind(order_id)
            .bind(delivery_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        info!(order_id = %order_id, delivery_at = %delivery_at, "Order rescheduled");
        Ok(())
    }

    // =========================================================================
    // Operator Aggregates
    // =========================================================================

    /// Total charged (after credit) for orders created inside `[start, end)`.
    pub async fn revenue_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let revenue: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_cents)
            FROM orders
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue.unwrap_or(0))
    }

    /// Distinct users who placed an order inside `[start, end)`.
    pub async fn active_buyers_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let buyers: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT user_id)
            FROM orders
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(buyers)
    }

    /// Best-selling products by units inside `[start, end)`.
    pub async fn top_sellers(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> DbResult<Vec<ProductSales>> {
        let rows = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                SUM(ol.quantity) AS units_sold,
                SUM(ol.quantity * ol.unit_price_cents) AS revenue_cents
            FROM order_lines ol
            INNER JOIN orders o ON o.id = ol.order_id
            INNER JOIN products p ON p.id = ol.product_id
            WHERE o.created_at >= ?1 AND o.created_at < ?2
            GROUP BY p.id, p.name
            ORDER BY units_sold DESC, p.name
            LIMIT ?3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Top sellers computed");
        Ok(rows)
    }
}
