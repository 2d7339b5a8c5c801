//! # Checkout Rejection Taxonomy
//!
//! Every way a checkout can fail, as one typed enum.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller error (fix the request)     Retryable (try again)              │
//! │  ─────────────────────────────      ──────────────────────             │
//! │  InvalidSession                     InsufficientStock (conflict)       │
//! │  EmptyCart                          CreditConflict                     │
//! │  Validation(..)                     NoCapacity (different slot)        │
//! │  OutOfDeliveryRange                 Storage(..) (infrastructure)       │
//! │                                                                         │
//! │  Policy denial (not retryable by the caller)                           │
//! │  ───────────────────────────────────────────                           │
//! │  AccountSuspended, SalesSuspended, ProductUnavailable                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bodega_core::{CoreError, ValidationError};
use bodega_db::DbError;

/// Everything that can reject or abort a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Session token unknown or revoked.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// The account is suspended at checkout time.
    #[error("Account is suspended")]
    AccountSuspended,

    /// The store-wide sales flag is set.
    #[error("Sales are temporarily suspended")]
    SalesSuspended,

    /// The delivery destination falls outside the store's geofence,
    /// or no destination coordinates are known at all.
    #[error("Delivery destination is outside the delivery area")]
    OutOfDeliveryRange,

    /// Nothing (unexpired) in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line references an inactive or missing product.
    #[error("Product {product_id} is no longer available")]
    ProductUnavailable { product_id: String },

    /// Requested quantity exceeds available stock. Raised both by the
    /// pricing pre-check and by a losing race at commit time.
    #[error("Insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// The credit balance changed between pricing and commit.
    #[error("Credit balance changed during checkout, please retry")]
    CreditConflict,

    /// No delivery window within the planning horizon has room.
    #[error("No delivery capacity available within the planning horizon")]
    NoCapacity,

    /// A request field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage-layer failure unrelated to the business outcome.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductUnavailable { product_id } => {
                CheckoutError::ProductUnavailable { product_id }
            }
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => CheckoutError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            CoreError::Validation(v) => CheckoutError::Validation(v),
        }
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
