//! # bodega-checkout: The Checkout Orchestration Pipeline
//!
//! Composes bodega-core (pure logic) and bodega-db (storage) into the
//! atomic order flow of the Bodega delivery store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega Checkout Flow                             │
//! │                                                                         │
//! │  outer surface (API / CLI)                                             │
//! │       │  CheckoutRequest                                                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bodega-checkout (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │  orchestrator ── the state machine (gates → price → commit)    │   │
//! │  │  scheduler ───── slot search over SlotPolicy windows           │   │
//! │  │  ops ─────────── cart adds, expiry sweep, delivery suspension  │   │
//! │  │  traits ──────── collaborator seams (session, catalog, ...)    │   │
//! │  │  backend ─────── SQLite implementation of every seam           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                         │                                       │
//! │       ▼                         ▼                                       │
//! │  bodega-core              bodega-db                                    │
//! │  (Money, pricing,         (repositories, the one                       │
//! │   geofence, slots)         commit transaction)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Identity is pinned once per request (no mid-flight session swap)
//! - Nothing mutates until the single commit transaction
//! - A rejection at any gate leaves no partial state

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod error;
pub mod ops;
pub mod orchestrator;
pub mod scheduler;
pub mod traits;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::SqliteBackend;
pub use error::{CheckoutError, CheckoutResult};
pub use ops::{add_to_cart, suspend_deliveries, sweep_expired_carts};
pub use orchestrator::{CheckoutPipeline, CheckoutReceipt, CheckoutRequest};
pub use scheduler::assign_slot;
pub use traits::{
    CartStore, CatalogReader, ConfigFlags, NotificationSink, OrderStore, SessionResolver,
    UserDirectory,
};
