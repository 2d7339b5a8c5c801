//! # Cart Repository
//!
//! Database operations for cart items.
//!
//! ## Expiry Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Item Lifetime                                │
//! │                                                                         │
//! │  add ──► row with expires_at = added_at + 24h                          │
//! │                 │                                                       │
//! │      reads filter WHERE expires_at > now   (lazy expiry)               │
//! │                 │                                                       │
//! │      sweep_expired(now) deletes lapsed rows (periodic cleanup)         │
//! │                 │                                                       │
//! │      checkout commit deletes the user's rows (cart consumed)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expired rows that the sweep hasn't reached yet are invisible to every
//! read path, so lazy expiry and the sweep agree on cart contents.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use bodega_core::{CartItem, CART_TTL_HOURS};

/// Repository for cart item operations.
///
/// This layer is deliberately dumb: the per-user unit cap and stock
/// checks live in `bodega-checkout`, which performs them before calling
/// [`CartRepository::upsert_item`].
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Adds units of a product to a user's cart.
    ///
    /// Merges with an existing unexpired row for the same product
    /// (quantities add, expiry refreshes); otherwise inserts a new row
    /// expiring [`CART_TTL_HOURS`] from now.
    pub async fn upsert_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<CartItem> {
        let expires_at = now + Duration::hours(CART_TTL_HOURS);

        let updated = sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = quantity + ?3, added_at = ?4, expires_at = ?5
            WHERE user_id = ?1 AND product_id = ?2 AND expires_at > ?4
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, user_id, product_id, quantity, added_at, expires_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&id)
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .bind(now)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        }

        debug!(user_id = %user_id, product_id = %product_id, quantity, "Cart item upserted");

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, quantity, added_at, expires_at
            FROM cart_items
            WHERE user_id = ?1 AND product_id = ?2 AND expires_at > ?3
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists a user's unexpired cart items, oldest first.
    pub async fn items_for(&self, user_id: &str, now: DateTime<Utc>) -> DbResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, quantity, added_at, expires_at
            FROM cart_items
            WHERE user_id = ?1 AND expires_at > ?2
            ORDER BY added_at
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Total unexpired units across a user's cart.
    ///
    /// ## Usage
    /// Enforcing the per-user cart cap before an add.
    pub async fn total_units(&self, user_id: &str, now: DateTime<Utc>) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(quantity)
            FROM cart_items
            WHERE user_id = ?1 AND expires_at > ?2
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// Removes one product from a user's cart.
    pub async fn remove(&self, user_id: &str, product_id: &str) -> DbResult<()> {
        sqlx::query(
            "DELETE FROM cart_items WHERE user_id = ?1 AND product_id = ?2",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user_id, product_id = %product_id, "Cart item removed");
        Ok(())
    }

    /// Empties a user's cart.
    pub async fn clear(&self, user_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id = %user_id, count = result.rows_affected(), "Cart cleared");
        Ok(result.rows_affected())
    }

    /// Deletes all expired cart rows store-wide.
    ///
    /// ## Returns
    /// Number of rows deleted.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE expires_at <= ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(count = result.rows_affected(), "Expired cart items swept");
        }
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn seeded_db() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert("carter", "51234567", "Calle 1", None, false)
            .await
            .unwrap();
        let product = db
            .products()
            .insert("Frijoles 1kg", None, 3_00, 20, 0)
            .await
            .unwrap();
        (db, user.id, product.id)
    }

    #[tokio::test]
    async fn test_upsert_merges_quantities() {
        let (db, user_id, product_id) = seeded_db().await;
        let repo = db.carts();
        let now = Utc::now();

        let item = repo.upsert_item(&user_id, &product_id, 2, now).await.unwrap();
        assert_eq!(item.quantity, 2);

        let item = repo.upsert_item(&user_id, &product_id, 1, now).await.unwrap();
        assert_eq!(item.quantity, 3);

        // Still a single row
        let items = repo.items_for(&user_id, now).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(repo.total_units(&user_id, now).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_expired_items_invisible() {
        let (db, user_id, product_id) = seeded_db().await;
        let repo = db.carts();
        let now = Utc::now();

        repo.upsert_item(&user_id, &product_id, 2, now).await.unwrap();

        let later = now + Duration::hours(CART_TTL_HOURS + 1);
        assert!(repo.items_for(&user_id, later).await.unwrap().is_empty());
        assert_eq!(repo.total_units(&user_id, later).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sweep_expired() {
        let (db, user_id, product_id) = seeded_db().await;
        let repo = db.carts();
        let now = Utc::now();

        repo.upsert_item(&user_id, &product_id, 2, now).await.unwrap();

        // Nothing expired yet
        assert_eq!(repo.sweep_expired(now).await.unwrap(), 0);

        let later = now + Duration::hours(CART_TTL_HOURS + 1);
        assert_eq!(repo.sweep_expired(later).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_and_remove() {
        let (db, user_id, product_id) = seeded_db().await;
        let repo = db.carts();
        let now = Utc::now();

        repo.upsert_item(&user_id, &product_id, 2, now).await.unwrap();
        repo.remove(&user_id, &product_id).await.unwrap();
        assert!(repo.items_for(&user_id, now).await.unwrap().is_empty());

        repo.upsert_item(&user_id, &product_id, 1, now).await.unwrap();
        assert_eq!(repo.clear(&user_id).await.unwrap(), 1);
    }
}
