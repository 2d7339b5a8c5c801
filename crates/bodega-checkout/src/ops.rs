//! # Cart and Operator Operations
//!
//! Flows around the checkout pipeline proper: adding to carts, sweeping
//! expired rows, and rescheduling deliveries when the store suspends a
//! delivery period.
//!
//! ## Add-To-Cart Gates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     add_to_cart(token, product, qty)                    │
//! │                                                                         │
//! │  1. quantity valid (positive, ≤ per-add cap) ──► Validation            │
//! │  2. resolve session ───────────────────────────► InvalidSession        │
//! │  3. product active ────────────────────────────► ProductUnavailable    │
//! │  4. cart cap: current + qty ≤ MAX_CART_UNITS ──► Validation            │
//! │  5. stock pre-check ───────────────────────────► InsufficientStock     │
//! │  6. upsert row (expiry = now + 24h)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check here is advisory; the commit transaction re-checks it
//! authoritatively.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use bodega_core::validation::{validate_cart_units, validate_quantity};
use bodega_core::{CartItem, SlotPolicy};

use crate::error::{CheckoutError, CheckoutResult};
use crate::traits::{CartStore, CatalogReader, NotificationSink, OrderStore, SessionResolver};

/// Adds units of a product to the caller's cart.
pub async fn add_to_cart(
    sessions: &dyn SessionResolver,
    catalog: &dyn CatalogReader,
    carts: &dyn CartStore,
    session_token: &str,
    product_id: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> CheckoutResult<CartItem> {
    validate_quantity(quantity)?;

    let user_id = sessions
        .resolve(session_token)
        .await?
        .ok_or(CheckoutError::InvalidSession)?;

    let product = catalog
        .active_product(product_id)
        .await?
        .ok_or_else(|| CheckoutError::ProductUnavailable {
            product_id: product_id.to_string(),
        })?;

    let current_units = carts.total_units(&user_id, now).await?;
    validate_cart_units(current_units, quantity)?;

    if quantity > product.available_qty {
        return Err(CheckoutError::InsufficientStock {
            product_id: product.id,
            available: product.available_qty,
            requested: quantity,
        });
    }

    let item = carts.upsert_item(&user_id, product_id, quantity, now).await?;

    debug!(
        user_id = %user_id,
        product_id = %product_id,
        quantity,
        total_units = current_units + quantity,
        "Added to cart"
    );

    Ok(item)
}

/// Deletes expired cart rows store-wide.
///
/// Reads already filter out expired rows, so this is pure cleanup; run
/// it periodically or before reporting cart statistics.
pub async fn sweep_expired_carts(
    carts: &dyn CartStore,
    now: DateTime<Utc>,
) -> CheckoutResult<u64> {
    let swept = carts.sweep_expired(now).await?;
    if swept > 0 {
        info!(swept, "Expired cart rows removed");
    }
    Ok(swept)
}

/// Reschedules every delivery falling inside `[start, end)` to the first
/// window with room at or after `end`, notifying each affected user.
///
/// ## Usage
/// Operator suspends deliveries for a period (outage, weather). Committed
/// orders are never cancelled, only moved.
///
/// ## Returns
/// Number of orders rescheduled.
pub async fn suspend_deliveries(
    orders: &dyn OrderStore,
    notices: &dyn NotificationSink,
    policy: &dyn SlotPolicy,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CheckoutResult<u64> {
    let affected = orders.orders_delivering_between(start, end).await?;
    let capacity = policy.capacity();
    let mut moved = 0u64;

    for order in &affected {
        // Candidates whose window begins inside the suspended period are
        // skipped; the alignment of the first window can reach back
        // before `end`.
        let mut target = None;
        for window in policy.candidate_windows(end) {
            if window.start < end {
                continue;
            }
            let occupied = orders
                .count_deliveries_between(window.start, window.end)
                .await?;
            if occupied < capacity {
                target = Some(window);
                break;
            }
        }

        let window = target.ok_or(CheckoutError::NoCapacity)?;
        orders.reschedule(&order.id, window.start).await?;
        notices
            .notify(
                Some(&order.user_id),
                &format!(
                    "Your delivery was moved to {} due to a temporary delivery suspension",
                    window.start.format("%Y-%m-%d %H:%M UTC")
                ),
                "reschedule",
            )
            .await?;
        moved += 1;
    }

    if moved > 0 {
        info!(moved, from = %start, to = %end, "Deliveries rescheduled");
    }

    Ok(moved)
}

// =============================================================================
// Integration Tests (real SQLite backend, in-memory)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SqliteBackend;
    use bodega_core::{
        CheckoutBatch, Order, OrderLine, RollingWindowPolicy, StockDecrement, MAX_CART_UNITS,
    };
    use bodega_db::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    async fn fixture() -> (Database, SqliteBackend, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert("maria", "+5351234567", "Calle 23", None, true)
            .await
            .unwrap();
        let token = db.sessions().create(&user.id).await.unwrap();
        let product = db
            .products()
            .insert("Arroz 1kg", None, 2_50, 10, 0)
            .await
            .unwrap();
        let backend = SqliteBackend::new(db.clone());
        (db, backend, token, product.id)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 7, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_add_to_cart_happy_path() {
        let (_db, backend, token, product_id) = fixture().await;
        let now = noon();

        let item = add_to_cart(&backend, &backend, &backend, &token, &product_id, 2, now)
            .await
            .unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.expires_at, now + Duration::hours(24));
    }

    #[tokio::test]
    async fn test_cart_cap_enforced() {
        let (_db, backend, token, product_id) = fixture().await;
        let now = noon();

        add_to_cart(&backend, &backend, &backend, &token, &product_id, MAX_CART_UNITS, now)
            .await
            .unwrap();

        let err = add_to_cart(&backend, &backend, &backend, &token, &product_id, 1, now)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_rejects_nonpositive_and_unknown() {
        let (_db, backend, token, product_id) = fixture().await;
        let now = noon();

        let err = add_to_cart(&backend, &backend, &backend, &token, &product_id, 0, now)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));

        let err = add_to_cart(&backend, &backend, &backend, &token, "missing", 1, now)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ProductUnavailable { .. }));

        let err = add_to_cart(&backend, &backend, &backend, "bad-token", &product_id, 1, now)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidSession));
    }

    #[tokio::test]
    async fn test_add_stock_precheck() {
        let (db, backend, token, _) = fixture().await;
        let now = noon();
        let scarce = db.products().insert("Café", None, 6_50, 1, 0).await.unwrap();

        let err = add_to_cart(&backend, &backend, &backend, &token, &scarce.id, 2, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_sweep_expired_carts() {
        let (_db, backend, token, product_id) = fixture().await;
        let now = noon();

        add_to_cart(&backend, &backend, &backend, &token, &product_id, 2, now)
            .await
            .unwrap();

        assert_eq!(sweep_expired_carts(&backend, now).await.unwrap(), 0);
        let later = now + Duration::hours(25);
        assert_eq!(sweep_expired_carts(&backend, later).await.unwrap(), 1);
    }

    /// Commits a minimal one-line order delivering at `delivery_at`.
    async fn commit_order(db: &Database, user_id: &str, product_id: &str, delivery_at: DateTime<Utc>) -> String {
        let order_id = Uuid::new_v4().to_string();
        let batch = CheckoutBatch {
            order: Order {
                id: order_id.clone(),
                user_id: user_id.to_string(),
                subtotal_cents: 2_50,
                credit_applied_cents: 0,
                total_cents: 2_50,
                delivery_at,
                created_at: noon(),
            },
            lines: vec![OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product_id.to_string(),
                quantity: 1,
                unit_price_cents: 2_50,
            }],
            stock_decrements: vec![StockDecrement {
                product_id: product_id.to_string(),
                quantity: 1,
            }],
            credit_debit_cents: 0,
        };
        db.checkout().commit_batch(&batch).await.unwrap();
        order_id
    }

    #[tokio::test]
    async fn test_suspend_deliveries_reschedules_and_notifies() {
        let (db, backend, _token, product_id) = fixture().await;
        let user = db.users().get_by_name("maria").await.unwrap().unwrap();
        let policy = RollingWindowPolicy::default();

        // Two orders delivering tomorrow afternoon
        let delivery = noon() + Duration::days(1);
        let o1 = commit_order(&db, &user.id, &product_id, delivery).await;
        let o2 = commit_order(&db, &user.id, &product_id, delivery + Duration::hours(1)).await;

        // Suspend that whole day
        let start = Utc.with_ymd_and_hms(2026, 9, 8, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 9, 9, 0, 0, 0).unwrap();
        let moved = suspend_deliveries(&backend, &backend, &policy, start, end)
            .await
            .unwrap();
        assert_eq!(moved, 2);

        // Both moved to at or after the suspension end
        for order_id in [&o1, &o2] {
            let order = db.orders().get_by_id(order_id).await.unwrap();
            assert!(order.delivery_at >= end);
        }

        // The user got reschedule notices
        let notices = db.notices().list_for_user(&user.id).await.unwrap();
        assert_eq!(
            notices.iter().filter(|n| n.kind == "reschedule").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_suspend_with_nothing_scheduled_is_noop() {
        let (_db, backend, _token, _product_id) = fixture().await;
        let policy = RollingWindowPolicy::default();

        let start = noon();
        let end = start + Duration::hours(6);
        let moved = suspend_deliveries(&backend, &backend, &policy, start, end)
            .await
            .unwrap();
        assert_eq!(moved, 0);
    }
}
