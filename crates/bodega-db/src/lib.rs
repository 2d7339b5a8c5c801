//! # bodega-db: Database Layer for the Bodega Order Core
//!
//! This crate provides database access for the Bodega delivery store.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bodega Data Flow                                │
//! │                                                                         │
//! │  bodega-checkout (orchestrator)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bodega-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ products users│    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ carts orders  │    │ 001_init.sql │  │   │
//! │  │   │ WAL + FKs     │    │ checkout ...  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, cart, order, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bodega_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/bodega.db")).await?;
//! let products = db.products().list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::checkout::CheckoutRepository;
pub use repository::config::ConfigRepository;
pub use repository::notice::NoticeRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::session::SessionRepository;
pub use repository::user::UserRepository;
