//! # Checkout Repository
//!
//! The single multi-table commit transaction.
//!
//! ## Commit Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      commit_batch(batch)                                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT order                                                         │
//! │    INSERT order_lines                                                   │
//! │    per product:                                                         │
//! │      UPDATE products SET available_qty = available_qty - q              │
//! │      WHERE id = ? AND available_qty >= q                                │
//! │        └── 0 rows? ──► StockConflict, Err return drops tx ──► ROLLBACK │
//! │    if credit applied:                                                   │
//! │      UPDATE users SET credit_cents = credit_cents - c                   │
//! │      WHERE id = ? AND credit_cents >= c                                 │
//! │        └── 0 rows? ──► CreditConflict ──► ROLLBACK                      │
//! │    DELETE cart_items for the user                                       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional `WHERE available_qty >= q` makes the decrement the
//! serialization point: two concurrent checkouts of the last units race
//! on the row, and exactly one sees rows_affected == 1. The loser's
//! failure rolls back every earlier statement, so no partial order ever
//! becomes visible.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use bodega_core::CheckoutBatch;

/// Repository holding the checkout commit transaction.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: SqlitePool,
}

impl CheckoutRepository {
    /// Creates a new CheckoutRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutRepository { pool }
    }

    /// Applies a checkout batch atomically.
    ///
    /// ## Returns
    /// * `Ok(())` - Order, lines, decrements, debit and cart clear all
    ///   landed; the order is visible
    /// * `Err(DbError::StockConflict)` - A product's stock changed since
    ///   pricing; nothing was written
    /// * `Err(DbError::CreditConflict)` - The credit balance changed
    ///   since pricing; nothing was written
    pub async fn commit_batch(&self, batch: &CheckoutBatch) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        debug!(
            order_id = %batch.order.id,
            user_id = %batch.order.user_id,
            lines = batch.lines.len(),
            total_cents = batch.order.total_cents,
            "Beginning checkout commit"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, subtotal_cents, credit_applied_cents,
                                total_cents, delivery_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&batch.order.id)
        .bind(&batch.order.user_id)
        .bind(batch.order.subtotal_cents)
        .bind(batch.order.credit_applied_cents)
        .bind(batch.order.total_cents)
        .bind(batch.order.delivery_at)
        .bind(batch.order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &batch.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (id, order_id, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&line.id)
            .bind(&line.order_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        // Conditional decrements: the WHERE clause re-checks stock under
        // the write lock, making this the serialization point.
        for dec in &batch.stock_decrements {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET available_qty = available_qty - ?2
                WHERE id = ?1 AND available_qty >= ?2
                "#,
            )
            .bind(&dec.product_id)
            .bind(dec.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT available_qty FROM products WHERE id = ?1")
                        .bind(&dec.product_id)
                        .fetch_optional(&mut *tx)
                        .await?
                        .unwrap_or(0);

                warn!(
                    order_id = %batch.order.id,
                    product_id = %dec.product_id,
                    available,
                    requested = dec.quantity,
                    "Stock conflict, rolling back checkout"
                );

                // Err drops tx, which rolls back the inserts above
                return Err(DbError::StockConflict {
                    product_id: dec.product_id.clone(),
                    available,
                    requested: dec.quantity,
                });
            }
        }

        if batch.credit_debit_cents > 0 {
            let result = sqlx::query(
                r#"
                UPDATE users
                SET credit_cents = credit_cents - ?2
                WHERE id = ?1 AND credit_cents >= ?2
                "#,
            )
            .bind(&batch.order.user_id)
            .bind(batch.credit_debit_cents)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(
                    order_id = %batch.order.id,
                    user_id = %batch.order.user_id,
                    debit_cents = batch.credit_debit_cents,
                    "Credit conflict, rolling back checkout"
                );

                return Err(DbError::CreditConflict {
                    user_id: batch.order.user_id.clone(),
                });
            }
        }

        // The cart is consumed by the purchase
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(&batch.order.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            order_id = %batch.order.id,
            user_id = %batch.order.user_id,
            total_cents = batch.order.total_cents,
            delivery_at = %batch.order.delivery_at,
            "Checkout committed"
        );

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bodega_core::{Order, OrderLine, StockDecrement};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    async fn seeded_db() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert("buyer", "51234567", "Calle 1", None, true)
            .await
            .unwrap();
        db.users().grant_credit(&user.id, 5_00).await.unwrap();
        let product = db
            .products()
            .insert("Leche 1L", None, 2_00, 10, 0)
            .await
            .unwrap();
        (db, user.id, product.id)
    }

    fn batch_for(user_id: &str, product_id: &str, qty: i64, credit: i64) -> CheckoutBatch {
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let subtotal = 2_00 * qty;
        CheckoutBatch {
            order: Order {
                id: order_id.clone(),
                user_id: user_id.to_string(),
                subtotal_cents: subtotal,
                credit_applied_cents: credit,
                total_cents: subtotal - credit,
                delivery_at: now + Duration::hours(3),
                created_at: now,
            },
            lines: vec![OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id,
                product_id: product_id.to_string(),
                quantity: qty,
                unit_price_cents: 2_00,
            }],
            stock_decrements: vec![StockDecrement {
                product_id: product_id.to_string(),
                quantity: qty,
            }],
            credit_debit_cents: credit,
        }
    }

    #[tokio::test]
    async fn test_commit_applies_all_mutations() {
        let (db, user_id, product_id) = seeded_db().await;
        let now = Utc::now();
        db.carts()
            .upsert_item(&user_id, &product_id, 3, now)
            .await
            .unwrap();

        let batch = batch_for(&user_id, &product_id, 3, 5_00);
        db.checkout().commit_batch(&batch).await.unwrap();

        let order = db.orders().get_by_id(&batch.order.id).await.unwrap();
        assert_eq!(order.total_cents, 1_00);

        let product = db.products().get_by_id(&product_id).await.unwrap();
        assert_eq!(product.available_qty, 7);

        let user = db.users().get_by_id(&user_id).await.unwrap();
        assert_eq!(user.credit_cents, 0);

        assert!(db.carts().items_for(&user_id, now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stock_conflict_rolls_back_everything() {
        let (db, user_id, product_id) = seeded_db().await;

        let batch = batch_for(&user_id, &product_id, 11, 5_00);
        let err = db.checkout().commit_batch(&batch).await.unwrap_err();

        match err {
            DbError::StockConflict {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 10);
                assert_eq!(requested, 11);
            }
            other => panic!("expected StockConflict, got {other:?}"),
        }

        // No partial state: order absent, stock and credit untouched
        assert!(db.orders().get_by_id(&batch.order.id).await.is_err());
        assert_eq!(
            db.products().get_by_id(&product_id).await.unwrap().available_qty,
            10
        );
        assert_eq!(db.users().get_by_id(&user_id).await.unwrap().credit_cents, 5_00);
    }

    #[tokio::test]
    async fn test_credit_conflict_rolls_back_everything() {
        let (db, user_id, product_id) = seeded_db().await;

        // Debit exceeds the 5.00 balance
        let batch = batch_for(&user_id, &product_id, 2, 6_00);
        let err = db.checkout().commit_batch(&batch).await.unwrap_err();
        assert!(matches!(err, DbError::CreditConflict { .. }));

        assert!(db.orders().get_by_id(&batch.order.id).await.is_err());
        assert_eq!(
            db.products().get_by_id(&product_id).await.unwrap().available_qty,
            10
        );
    }

    #[tokio::test]
    async fn test_sequential_commits_drain_stock_exactly() {
        let (db, user_id, product_id) = seeded_db().await;

        // 10 units available: 3 + 3 + 3 commit, the fourth 3 conflicts
        for _ in 0..3 {
            let batch = batch_for(&user_id, &product_id, 3, 0);
            db.checkout().commit_batch(&batch).await.unwrap();
        }

        let batch = batch_for(&user_id, &product_id, 3, 0);
        let err = db.checkout().commit_batch(&batch).await.unwrap_err();
        assert!(matches!(err, DbError::StockConflict { available: 1, .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_commits_never_oversell() {
        // A file-backed pool with several connections so the commits
        // genuinely race on the write lock (in-memory is single-conn).
        let path = std::env::temp_dir().join(format!("bodega-oversell-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();

        let user = db
            .users()
            .insert("buyer", "51234567", "Calle 1", None, true)
            .await
            .unwrap();
        let product = db
            .products()
            .insert("Cafe 250g", None, 2_00, 5, 0)
            .await
            .unwrap();

        // 16 checkouts race for 5 units; exactly 5 may win
        let mut handles = Vec::new();
        for _ in 0..16 {
            let checkout = db.checkout();
            let user_id = user.id.clone();
            let product_id = product.id.clone();
            handles.push(tokio::spawn(async move {
                let batch = batch_for(&user_id, &product_id, 1, 0);
                checkout.commit_batch(&batch).await
            }));
        }

        let mut committed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => committed += 1,
                Err(DbError::StockConflict { available, .. }) => assert!(available >= 0),
                Err(other) => panic!("unexpected failure: {other:?}"),
            }
        }

        assert_eq!(committed, 5);
        assert_eq!(
            db.products().get_by_id(&product.id).await.unwrap().available_qty,
            0
        );
        assert_eq!(db.orders().list_for_user(&user.id).await.unwrap().len(), 5);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
