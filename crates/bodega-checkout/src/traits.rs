//! # Collaborator Traits
//!
//! The seams between the checkout pipeline and its surroundings.
//!
//! ## Why Traits Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The pipeline never talks to SQLite directly. Each concern it needs    │
//! │  from the outside world is one small trait:                            │
//! │                                                                         │
//! │    SessionResolver   token → user id                                   │
//! │    UserDirectory     user id → account snapshot                        │
//! │    CatalogReader     product id → active catalog snapshot              │
//! │    CartStore         cart rows, unit totals, expiry sweep              │
//! │    ConfigFlags       store-wide sales suspension                       │
//! │    OrderStore        slot occupancy counts + the atomic commit         │
//! │    NotificationSink  user-facing notices                               │
//! │                                                                         │
//! │  bodega_db::Database satisfies all of them through SqliteBackend;      │
//! │  tests can substitute any single seam.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bodega_core::{CartItem, CheckoutBatch, Order, Product, User};

use crate::error::CheckoutResult;

/// Resolves opaque session tokens to user identities.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Returns the user ID behind a token, or `None` for an unknown or
    /// revoked token.
    async fn resolve(&self, token: &str) -> CheckoutResult<Option<String>>;
}

/// Looks up account snapshots.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_by_id(&self, user_id: &str) -> CheckoutResult<User>;
}

/// Reads catalog snapshots for pricing and validation.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Returns the product only if it exists and is active.
    async fn active_product(&self, product_id: &str) -> CheckoutResult<Option<Product>>;
}

/// Cart persistence.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// A user's unexpired cart rows, oldest first.
    async fn items_for(&self, user_id: &str, now: DateTime<Utc>) -> CheckoutResult<Vec<CartItem>>;

    /// Total unexpired units in a user's cart.
    async fn total_units(&self, user_id: &str, now: DateTime<Utc>) -> CheckoutResult<i64>;

    /// Adds units of a product, merging with an existing row.
    async fn upsert_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> CheckoutResult<CartItem>;

    /// Deletes expired rows store-wide; returns how many went away.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> CheckoutResult<u64>;
}

/// Store-wide configuration flags.
#[async_trait]
pub trait ConfigFlags: Send + Sync {
    /// Whether the sales-suspension flag blocks checkouts at `now`.
    async fn sales_suspended(&self, now: DateTime<Utc>) -> CheckoutResult<bool>;
}

/// Committed orders: occupancy counts, the atomic commit, reschedules.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders delivering inside `[start, end)`.
    async fn count_deliveries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CheckoutResult<i64>;

    /// Applies a checkout batch in one transaction; all or nothing.
    async fn commit(&self, batch: &CheckoutBatch) -> CheckoutResult<()>;

    /// Orders whose delivery falls inside `[start, end)`.
    async fn orders_delivering_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CheckoutResult<Vec<Order>>;

    /// Moves an order's delivery to a new moment.
    async fn reschedule(&self, order_id: &str, delivery_at: DateTime<Utc>) -> CheckoutResult<()>;
}

/// Delivers user-facing notices.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Records a notice; `user_id = None` broadcasts to everyone.
    async fn notify(&self, user_id: Option<&str>, message: &str, kind: &str)
        -> CheckoutResult<()>;
}
