//! # Pricing Engine
//!
//! Turns a cart plus catalog snapshots into a priced quote.
//!
//! ## The Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         price_cart                                      │
//! │                                                                         │
//! │  For each cart line (item, product):                                   │
//! │    1. product inactive?            → ProductUnavailable                │
//! │    2. quantity > available stock?  → InsufficientStock                 │
//! │    3. unit = price × (1 − discount), rounded half-up to the cent       │
//! │    4. line total = unit × quantity                                     │
//! │                                                                         │
//! │  subtotal       = Σ line totals                                        │
//! │  credit_applied = min(available credit, subtotal)                      │
//! │  total          = subtotal − credit_applied        (never negative)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! The engine never mutates anything. The stock check here is a fast
//! pre-validation; the authoritative check-and-decrement happens inside the
//! commit transaction (see bodega-db's checkout repository).

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Product};

// =============================================================================
// Priced Output
// =============================================================================

/// One priced cart line: the product snapshot the order will freeze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    /// Product name at pricing time (for receipts).
    pub product_name: String,
    pub quantity: i64,
    /// Discounted unit price, rounded half-up to the cent.
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub line_total: Money,
}

/// The result of pricing a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    /// Sum of line totals, before credit.
    pub subtotal: Money,
    /// Credit consumed: `min(available credit, subtotal)`.
    pub credit_applied: Money,
    /// Amount to charge: `subtotal − credit_applied`. Never negative.
    pub total: Money,
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a cart against catalog snapshots and an available credit balance.
///
/// ## Arguments
/// * `lines` - cart items paired with the product each references
/// * `available_credit` - the user's spendable credit balance
///
/// ## Errors
/// * [`CoreError::ProductUnavailable`] - a referenced product is inactive
/// * [`CoreError::InsufficientStock`] - a requested quantity exceeds stock
///
/// ## Example
/// Scenario: price 100.00, discount 10%, qty 2, credit 50.00
/// → subtotal 180.00, credit applied 50.00, total 130.00.
pub fn price_cart(lines: &[(CartItem, Product)], available_credit: Money) -> CoreResult<PricedCart> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut subtotal = Money::zero();

    for (item, product) in lines {
        if !product.is_active {
            return Err(CoreError::ProductUnavailable {
                product_id: product.id.clone(),
            });
        }

        if item.quantity > product.available_qty {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                available: product.available_qty,
                requested: item.quantity,
            });
        }

        let unit_price = product.discounted_unit_price();
        let line_total = unit_price.multiply_quantity(item.quantity);
        subtotal += line_total;

        priced.push(PricedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: item.quantity,
            unit_price,
            line_total,
        });
    }

    // Greedy credit application: consume as much credit as the subtotal
    // allows, never more. Conservation: credit_applied ≤ available_credit.
    let credit_applied = available_credit.min(subtotal);
    let total = subtotal - credit_applied;

    Ok(PricedCart {
        lines: priced,
        subtotal,
        credit_applied,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
