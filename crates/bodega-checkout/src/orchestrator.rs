//! # Checkout Orchestrator
//!
//! The checkout state machine: gates, pricing, slot assignment, commit.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          checkout(request)                              │
//! │                                                                         │
//! │  1. resolve session ───────────────► InvalidSession                    │
//! │  2. load account, suspension gate ─► AccountSuspended                  │
//! │  3. store-wide sales flag ─────────► SalesSuspended                    │
//! │  4. geofence on destination ───────► OutOfDeliveryRange                │
//! │  5. load unexpired cart ───────────► EmptyCart                         │
//! │  6. pair lines with catalog ───────► ProductUnavailable                │
//! │  7. price (discounts + credit) ────► InsufficientStock (pre-check)     │
//! │  8. assign delivery slot ──────────► NoCapacity                        │
//! │  9. commit batch (ONE transaction) ► InsufficientStock / CreditConflict│
//! │ 10. receipt                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pinning
//! The session resolves to a user ID exactly once, at step 1. The rest of
//! the pipeline works from that snapshot, so a logout or account change
//! mid-flight cannot redirect the order.
//!
//! ## Purity Until Commit
//! Steps 1-8 only read. Every mutation is collected into a
//! [`CheckoutBatch`] and applied in step 9's single transaction, so a
//! rejection at any step leaves no trace.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use bodega_core::{
    price_cart, CartItem, CheckoutBatch, Coordinates, Geofence, Money, Order, OrderLine,
    PricedLine, Product, SlotPolicy, SlotWindow, StockDecrement,
};

use crate::backend::SqliteBackend;
use crate::error::{CheckoutError, CheckoutResult};
use crate::scheduler::assign_slot;
use crate::traits::{
    CartStore, CatalogReader, ConfigFlags, OrderStore, SessionResolver, UserDirectory,
};

// =============================================================================
// Request / Receipt
// =============================================================================

/// A checkout request as it arrives from the outer surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Opaque session token.
    pub session_token: String,

    /// When the customer would like the delivery, if they expressed a
    /// preference. Defaults to the checkout time; the assigned window may
    /// be later if earlier windows are full.
    pub requested_delivery: Option<DateTime<Utc>>,

    /// Delivery destination for this order. Falls back to the account's
    /// stored coordinates when absent.
    pub destination: Option<Coordinates>,
}

/// What a successful checkout hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub lines: Vec<PricedLine>,
    pub subtotal: Money,
    pub credit_applied: Money,
    pub total: Money,
    /// The assigned delivery window.
    pub delivery_window: SlotWindow,
}

// =============================================================================
// Pipeline
// =============================================================================

/// The composed checkout pipeline.
///
/// Holds one `Arc` per collaborator seam so tests can substitute any
/// single one; [`CheckoutPipeline::with_backend`] wires them all to the
/// SQLite backend for production use.
#[derive(Clone)]
pub struct CheckoutPipeline {
    sessions: Arc<dyn SessionResolver>,
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn CatalogReader>,
    carts: Arc<dyn CartStore>,
    flags: Arc<dyn ConfigFlags>,
    orders: Arc<dyn OrderStore>,
    policy: Arc<dyn SlotPolicy>,
    geofence: Geofence,
}

impl CheckoutPipeline {
    /// Builds a pipeline from individually supplied seams.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn SessionResolver>,
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn CatalogReader>,
        carts: Arc<dyn CartStore>,
        flags: Arc<dyn ConfigFlags>,
        orders: Arc<dyn OrderStore>,
        policy: Arc<dyn SlotPolicy>,
        geofence: Geofence,
    ) -> Self {
        CheckoutPipeline {
            sessions,
            users,
            catalog,
            carts,
            flags,
            orders,
            policy,
            geofence,
        }
    }

    /// Wires every seam to the SQLite backend.
    pub fn with_backend(
        backend: SqliteBackend,
        policy: Arc<dyn SlotPolicy>,
        geofence: Geofence,
    ) -> Self {
        let backend = Arc::new(backend);
        CheckoutPipeline {
            sessions: backend.clone(),
            users: backend.clone(),
            catalog: backend.clone(),
            carts: backend.clone(),
            flags: backend.clone(),
            orders: backend,
            policy,
            geofence,
        }
    }

    /// Runs the full checkout pipeline for one request.
    ///
    /// `now` is injected rather than read from the clock so expiry,
    /// suspension and slot decisions are reproducible in tests.
    #[instrument(skip(self, request), fields(requested = ?request.requested_delivery))]
    pub async fn checkout(
        &self,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> CheckoutResult<CheckoutReceipt> {
        // 1. Identity, pinned for the rest of the flow
        let user_id = self
            .sessions
            .resolve(&request.session_token)
            .await?
            .ok_or(CheckoutError::InvalidSession)?;

        // 2. Account standing
        let user = self.users.user_by_id(&user_id).await?;
        if user.is_suspended(now) {
            debug!(user_id = %user.id, "Checkout rejected: account suspended");
            return Err(CheckoutError::AccountSuspended);
        }

        // 3. Store-wide sales flag
        if self.flags.sales_suspended(now).await? {
            debug!(user_id = %user.id, "Checkout rejected: sales suspended");
            return Err(CheckoutError::SalesSuspended);
        }

        // 4. Geofence on the destination (request coords win, stored
        //    account coords are the fallback; neither present → reject)
        let destination = request.destination.or_else(|| user.coordinates());
        if !self.geofence.contains(destination) {
            debug!(user_id = %user.id, "Checkout rejected: out of delivery range");
            return Err(CheckoutError::OutOfDeliveryRange);
        }

        // 5. Cart, with expired rows already filtered out
        let items = self.carts.items_for(&user_id, now).await?;
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // 6. Catalog snapshots
        let lines = self.resolve_catalog(items).await?;

        // 7. Pricing (pure)
        let quote = price_cart(&lines, user.credit())?;

        // 8. Delivery slot; no stated preference means "as soon as possible"
        let requested = request.requested_delivery.unwrap_or(now);
        let window = assign_slot(self.policy.as_ref(), self.orders.as_ref(), requested).await?;

        // 9. Collect the batch and commit it in one transaction
        let order_id = Uuid::new_v4().to_string();
        let batch = CheckoutBatch {
            order: Order {
                id: order_id.clone(),
                user_id: user_id.clone(),
                subtotal_cents: quote.subtotal.cents(),
                credit_applied_cents: quote.credit_applied.cents(),
                total_cents: quote.total.cents(),
                delivery_at: window.start,
                created_at: now,
            },
            lines: quote
                .lines
                .iter()
                .map(|line| OrderLine {
                    id: Uuid::new_v4().to_string(),
                    order_id: order_id.clone(),
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                })
                .collect(),
            stock_decrements: quote
                .lines
                .iter()
                .map(|line| StockDecrement {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            credit_debit_cents: quote.credit_applied.cents(),
        };

        self.orders.commit(&batch).await?;

        info!(
            order_id = %order_id,
            user_id = %user_id,
            total_cents = quote.total.cents(),
            delivery_at = %window.start,
            "Checkout complete"
        );

        Ok(CheckoutReceipt {
            order_id,
            lines: quote.lines,
            subtotal: quote.subtotal,
            credit_applied: quote.credit_applied,
            total: quote.total,
            delivery_window: window,
        })
    }

    /// Pairs each cart item with the active product it references.
    async fn resolve_catalog(
        &self,
        items: Vec<CartItem>,
    ) -> CheckoutResult<Vec<(CartItem, Product)>> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .catalog
                .active_product(&item.product_id)
                .await?
                .ok_or_else(|| CheckoutError::ProductUnavailable {
                    product_id: item.product_id.clone(),
                })?;
            lines.push((item, product));
        }
        Ok(lines)
    }
}

// =============================================================================
// Integration Tests (real SQLite backend, in-memory)
// =============================================================================
