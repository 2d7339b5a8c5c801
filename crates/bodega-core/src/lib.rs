//! # bodega-core: Pure Business Logic for the Bodega Order Core
//!
//! This crate is the **heart** of the Bodega delivery store. It contains all
//! checkout business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bodega-checkout (Orchestrator)                  │   │
//! │  │   session → geofence → cart → pricing → slot → atomic commit   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ schedule  │  │   │
//! │  │   │  Product  │  │   Money   │  │ price_cart│  │SlotPolicy │  │   │
//! │  │   │   Order   │  │ Discount  │  │ PricedCart│  │SlotWindow │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                │   │
//! │  │   │    geo    │  │ validation│                                │   │
//! │  │   │ Geofence  │  │   rules   │                                │   │
//! │  │   └───────────┘  └───────────┘                                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bodega-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Order, CheckoutBatch, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`geo`] - Great-circle distance and the delivery geofence
//! - [`pricing`] - Cart pricing: per-product discounts + user credit
//! - [`schedule`] - Delivery slot policies (rolling window, business-day)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float drift
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Time Is An Argument**: "now" is always passed in, never read from a clock

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod geo;
pub mod money;
pub mod pricing;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bodega_core::Money` instead of
// `use bodega_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use geo::{Coordinates, Geofence};
pub use money::{DiscountRate, Money};
pub use pricing::{price_cart, PricedCart, PricedLine};
pub use schedule::{BusinessDayShiftPolicy, RollingWindowPolicy, SlotPolicy, SlotWindow};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum total units allowed in a single cart.
///
/// ## Business Reason
/// The store rations purchases; carts are capped at five units total so one
/// customer cannot empty the shelf in a single order.
pub const MAX_CART_UNITS: i64 = 5;

/// Hours a cart item stays valid before the expiry sweep removes it.
pub const CART_TTL_HOURS: i64 = 24;

/// Default delivery radius around the store, in kilometers.
pub const DEFAULT_DELIVERY_RADIUS_KM: f64 = 10.0;
