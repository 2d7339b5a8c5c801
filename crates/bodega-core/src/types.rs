//! # Domain Types
//!
//! Core domain types used throughout the Bodega order core.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  credit_cents   │   │  price_cents    │   │  user_id (FK)   │       │
//! │  │  lat/lon        │   │  discount_bps   │   │  product_id(FK) │       │
//! │  │  status         │   │  available_qty  │   │  expires_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │    OrderLine    │   │  CheckoutBatch  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  total_cents    │   │  unit price     │   │  order + lines  │       │
//! │  │  delivery_at    │   │  at time of     │   │  stock decrs    │       │
//! │  │  created_at     │   │  sale (frozen)  │   │  credit debit   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderLine` freezes the discounted unit price at the time of sale.
//! Later catalog price changes never rewrite committed order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::money::{DiscountRate, Money};

// =============================================================================
// Account Status
// =============================================================================

/// The standing of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account in good standing; can check out.
    Active,
    /// Account suspended by an operator; cannot check out.
    Suspended,
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered customer of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name - unique business identifier.
    pub name: String,

    /// Contact phone number (validated at registration).
    pub phone: String,

    /// Free-form delivery address.
    pub address: String,

    /// Delivery latitude, if the user has shared coordinates.
    pub lat: Option<f64>,

    /// Delivery longitude, if the user has shared coordinates.
    pub lon: Option<f64>,

    /// Whether the stored coordinates fell inside the geofence at the
    /// last registration/profile update. Refreshed on coordinate change.
    pub in_range: bool,

    /// Pre-paid credit balance in cents, consumable against order totals.
    pub credit_cents: i64,

    /// Account standing. Suspended users cannot check out.
    pub status: AccountStatus,

    /// Optional end of the suspension. A suspension with an end timestamp
    /// in the past no longer blocks checkout.
    pub suspended_until: Option<DateTime<Utc>>,

    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the user's delivery coordinates, if both parts are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// Returns the credit balance as Money.
    #[inline]
    pub fn credit(&self) -> Money {
        Money::from_cents(self.credit_cents)
    }

    /// Checks whether the account is suspended at `now`.
    ///
    /// A suspension without an end timestamp is indefinite; one with an end
    /// timestamp lapses once `now` passes it.
    pub fn is_suspended(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            AccountStatus::Active => false,
            AccountStatus::Suspended => match self.suspended_until {
                Some(until) => now < until,
                None => true,
            },
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to customers.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Unit price in cents (before discount). Never negative.
    pub price_cents: i64,

    /// Units currently available for sale. Never negative.
    pub available_qty: i64,

    /// Per-product discount in basis points (1000 = 10%).
    pub discount_bps: u32,

    /// Whether product is purchasable (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the list price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the product discount rate.
    #[inline]
    pub fn discount(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// The discounted unit price, rounded half-up to the cent.
    pub fn discounted_unit_price(&self) -> Money {
        self.price().apply_discount(self.discount())
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A (user, product, quantity) cart entry with an expiry timestamp.
///
/// Created on add-to-cart, destroyed on checkout commit or expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
    /// Cart entries lapse 24 hours after being added.
    pub expires_at: DateTime<Utc>,
}

impl CartItem {
    /// Checks whether this entry has lapsed at `now`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// =============================================================================
// Order
// =============================================================================

/// A committed sale. Immutable once committed, except for delivery
/// rescheduling by operational overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Sum of priced lines before credit.
    pub subtotal_cents: i64,
    /// Credit consumed against the subtotal.
    pub credit_applied_cents: i64,
    /// Amount actually charged: subtotal − credit applied. Never negative.
    pub total_cents: i64,
    /// Start of the assigned delivery slot.
    pub delivery_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the charged total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item in an order.
/// Uses snapshot pattern to freeze the priced product at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Discounted unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total: frozen unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Checkout Batch
// =============================================================================

/// One intended stock decrement inside a checkout batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDecrement {
    pub product_id: String,
    pub quantity: i64,
}

/// The full set of mutations a checkout intends to commit, collected up
/// front and applied inside ONE storage transaction.
///
/// ## Why A Batch?
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  The pipeline stays pure until the very last step. Instead of issuing  │
/// │  writes as it goes, it collects them here:                             │
/// │                                                                         │
/// │    insert order ─┐                                                      │
/// │    insert lines  ├── one serializable transaction: all or nothing       │
/// │    stock -= qty  │   (stock checks re-run conditionally inside it)      │
/// │    credit -= used│                                                      │
/// │    clear cart  ──┘                                                      │
/// │                                                                         │
/// │  Any failure rolls the whole batch back; no partial commit is ever     │
/// │  visible.                                                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutBatch {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub stock_decrements: Vec<StockDecrement>,
    /// Credit to debit from the user's balance (0 if none applied).
    pub credit_debit_cents: i64,
}

// =============================================================================
// Notice
// =============================================================================

/// A notification for a user (delivery rescheduled, account news, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notice {
    pub id: String,
    /// Target user; `None` means a store-wide notice.
    pub user_id: Option<String>,
    pub message: String,
    /// Notice kind: "info", "warning", "reschedule", ...
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_user() -> User {
        User {
            id: "u-1".to_string(),
            name: "maria".to_string(),
            phone: "+5355512345".to_string(),
            address: "Calle 23 #456".to_string(),
            lat: Some(23.12),
            lon: Some(-82.38),
            in_range: true,
            credit_cents: 0,
            status: AccountStatus::Active,
            suspended_until: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_user_coordinates_require_both_parts() {
        let mut user = base_user();
        assert!(user.coordinates().is_some());

        user.lon = None;
        assert!(user.coordinates().is_none());
    }

    #[test]
    fn test_suspension_with_lapsed_end_is_inactive() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let mut user = base_user();

        user.status = AccountStatus::Suspended;
        assert!(user.is_suspended(now)); // indefinite

        user.suspended_until = Some(now - chrono::Duration::hours(1));
        assert!(!user.is_suspended(now)); // lapsed

        user.suspended_until = Some(now + chrono::Duration::hours(1));
        assert!(user.is_suspended(now)); // still running
    }

    #[test]
    fn test_discounted_unit_price() {
        let now = Utc::now();
        let product = Product {
            id: "p-1".to_string(),
            name: "Rice 1kg".to_string(),
            description: None,
            price_cents: 10_000,
            available_qty: 10,
            discount_bps: 1_000,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.discounted_unit_price().cents(), 9_000);
    }

    #[test]
    fn test_cart_item_expiry() {
        let now = Utc::now();
        let item = CartItem {
            id: "c-1".to_string(),
            user_id: "u-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 2,
            added_at: now - chrono::Duration::hours(25),
            expires_at: now - chrono::Duration::hours(1),
        };
        assert!(item.is_expired(now));
        assert!(!item.is_expired(now - chrono::Duration::hours(2)));
    }

    #[test]
    fn test_order_line_total() {
        let line = OrderLine {
            id: "l-1".to_string(),
            order_id: "o-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 2,
            unit_price_cents: 9_000,
        };
        assert_eq!(line.line_total().cents(), 18_000);
    }
}
