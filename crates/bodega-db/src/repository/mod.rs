//! # Repository Modules
//!
//! Data access repositories for the Bodega store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Layer                                    │
//! │                                                                         │
//! │  Each repository:                                                       │
//! │  • Owns a clone of the SqlitePool (cheap, Arc internally)              │
//! │  • Exposes typed async methods (no raw SQL leaks out)                  │
//! │  • Returns DbResult<T> with categorized errors                         │
//! │                                                                         │
//! │  product  ──► catalog reads, stock/discount updates                    │
//! │  user     ──► accounts, credit grants, suspension                      │
//! │  session  ──► opaque tokens → user identity                            │
//! │  cart     ──► cart item CRUD + expiry sweep                            │
//! │  order    ──► order reads, slot occupancy counts, aggregates           │
//! │  config   ──► store-wide flags (sales_suspended, ...)                  │
//! │  notice   ──► user-facing notices                                      │
//! │  checkout ──► the single multi-table commit transaction                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod notice;
pub mod order;
pub mod product;
pub mod session;
pub mod user;
