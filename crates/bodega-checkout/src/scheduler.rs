//! # Delivery Slot Assignment
//!
//! Walks a policy's candidate windows against committed-order occupancy.
//!
//! ## The Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  policy.candidate_windows(requested)                                    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  [W1] count=10  full      ──► skip                                     │
//! │  [W2] count=10  full      ──► skip                                     │
//! │  [W3] count=7   has room  ──► assign W3                                │
//! │                                                                         │
//! │  List exhausted ──► NoCapacity (the list is finite by contract)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The count is a read, not a reservation: two concurrent checkouts can
//! both pick W3 and the window can end up one over capacity. Slot capacity
//! is advisory routing; stock, in contrast, is enforced hard inside the
//! commit transaction.

use chrono::{DateTime, Utc};
use tracing::debug;

use bodega_core::{SlotPolicy, SlotWindow};

use crate::error::{CheckoutError, CheckoutResult};
use crate::traits::OrderStore;

/// Finds the earliest candidate window with remaining capacity.
///
/// ## Errors
/// * [`CheckoutError::NoCapacity`] - every window in the policy's horizon
///   is full
pub async fn assign_slot(
    policy: &dyn SlotPolicy,
    orders: &dyn OrderStore,
    requested: DateTime<Utc>,
) -> CheckoutResult<SlotWindow> {
    let capacity = policy.capacity();

    for window in policy.candidate_windows(requested) {
        let occupied = orders
            .count_deliveries_between(window.start, window.end)
            .await?;

        if occupied < capacity {
            debug!(
                start = %window.start,
                end = %window.end,
                occupied,
                capacity,
                "Delivery slot assigned"
            );
            return Ok(window);
        }
    }

    Err(CheckoutError::NoCapacity)
}

// =============================================================================
// Unit Tests (mock order store)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bodega_core::{CheckoutBatch, Order, RollingWindowPolicy};
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// An order store that only remembers delivery timestamps.
    struct MockOrders {
        deliveries: Mutex<Vec<DateTime<Utc>>>,
    }

    impl MockOrders {
        fn with(deliveries: Vec<DateTime<Utc>>) -> Self {
            MockOrders {
                deliveries: Mutex::new(deliveries),
            }
        }
    }

    #[async_trait]
    impl OrderStore for MockOrders {
        async fn count_deliveries_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> CheckoutResult<i64> {
            let deliveries = self.deliveries.lock().unwrap();
            Ok(deliveries.iter().filter(|d| start <= **d && **d < end).count() as i64)
        }

        async fn commit(&self, batch: &CheckoutBatch) -> CheckoutResult<()> {
            self.deliveries.lock().unwrap().push(batch.order.delivery_at);
            Ok(())
        }

        async fn orders_delivering_between(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> CheckoutResult<Vec<Order>> {
            Ok(Vec::new())
        }

        async fn reschedule(
            &self,
            _order_id: &str,
            _delivery_at: DateTime<Utc>,
        ) -> CheckoutResult<()> {
            Ok(())
        }
    }

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 7, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_window_with_room_wins() {
        let policy = RollingWindowPolicy {
            capacity: 2,
            ..Default::default()
        };
        let orders = MockOrders::with(vec![nine_am()]);

        let window = assign_slot(&policy, &orders, nine_am()).await.unwrap();

        // One order in [08:00, 11:00), capacity 2: still room
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 9, 7, 8, 0, 0).unwrap());
        assert!(window.contains(nine_am()));
    }

    #[tokio::test]
    async fn test_full_windows_skipped_in_order() {
        let policy = RollingWindowPolicy {
            capacity: 1,
            ..Default::default()
        };
        // First two windows full: 08-11 and 11-14
        let orders = MockOrders::with(vec![
            nine_am(),
            Utc.with_ymd_and_hms(2026, 9, 7, 12, 0, 0).unwrap(),
        ]);

        let window = assign_slot(&policy, &orders, nine_am()).await.unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 9, 7, 14, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_exhausted_horizon_is_no_capacity() {
        let policy = RollingWindowPolicy {
            capacity: 0, // every window reads as full
            ..Default::default()
        };
        let orders = MockOrders::with(Vec::new());

        let err = assign_slot(&policy, &orders, nine_am()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::NoCapacity));
    }
}
