//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The store's ledger cannot drift:                                       │
//! │    a cart priced twice must price to the same cent.                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    $1.80 = 180 cents, always exact                                      │
//! │    Discounts round half-up to the cent, once per line, explicitly       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bodega_core::money::{DiscountRate, Money};
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(10_000); // $100.00
//!
//! // Apply a 10% product discount (rounds half-up to the cent)
//! let discounted = price.apply_discount(DiscountRate::from_percentage(10.0));
//! assert_eq!(discounted.cents(), 9_000); // $90.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative intermediates for audits/adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: product
/// prices, line subtotals, credit balances, order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Why Cents?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two money values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bodega_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(9_000); // $90.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 18_000); // $180.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount and returns the discounted price.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  DISCOUNTED PRICE, ROUNDED HALF-UP TO THE CENT                      │
    /// │                                                                     │
    /// │  discounted = price × (1 − pct/100), rounded to 2 decimals          │
    /// │                                                                     │
    /// │  Integer math: (cents × (10000 − bps) + 5000) / 10000               │
    /// │  The +5000 provides half-up rounding (5000/10000 = 0.5)             │
    /// │                                                                     │
    /// │  The rounding happens ONCE, on the unit price, before the line      │
    /// │  total is computed. Line totals are exact multiples after that.     │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use bodega_core::money::{DiscountRate, Money};
    ///
    /// let price = Money::from_cents(10_000);               // $100.00
    /// let rate = DiscountRate::from_bps(1_000);            // 10%
    /// assert_eq!(price.apply_discount(rate).cents(), 9_000); // $90.00
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        // Use i128 to prevent overflow on large amounts
        let keep_bps = (10_000 - rate.bps().min(10_000)) as i128;
        let discounted = (self.0 as i128 * keep_bps + 5_000) / 10_000;
        Money::from_cents(discounted as i64)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A per-product discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% off; 10000 bps = free.
/// Fractional percentages (e.g. 12.5%) stay exact integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and receipts. Callers handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_discount_basic() {
        // $100.00 at 10% off = $90.00
        let price = Money::from_cents(10_000);
        let rate = DiscountRate::from_bps(1_000);
        assert_eq!(price.apply_discount(rate).cents(), 9_000);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // $0.99 at 50% off = $0.495 → rounds to $0.50
        let price = Money::from_cents(99);
        let rate = DiscountRate::from_bps(5_000);
        assert_eq!(price.apply_discount(rate).cents(), 50);

        // $1.05 at 33.33% off = $0.700035 → $0.70
        let price = Money::from_cents(105);
        let rate = DiscountRate::from_bps(3_333);
        assert_eq!(price.apply_discount(rate).cents(), 70);
    }

    #[test]
    fn test_discount_full_and_zero() {
        let price = Money::from_cents(1234);
        assert_eq!(price.apply_discount(DiscountRate::zero()).cents(), 1234);
        assert_eq!(price.apply_discount(DiscountRate::from_bps(10_000)).cents(), 0);
        // Rates above 100% clamp to free, never negative
        assert_eq!(price.apply_discount(DiscountRate::from_bps(12_000)).cents(), 0);
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        assert_eq!(DiscountRate::from_percentage(10.0).bps(), 1_000);
        assert_eq!(DiscountRate::from_percentage(12.5).bps(), 1_250);
        assert!((DiscountRate::from_bps(1_250).percentage() - 12.5).abs() < 0.001);
    }

    #[test]
    fn test_min_and_checks() {
        let a = Money::from_cents(100);
        let b = Money::from_cents(50);
        assert_eq!(a.min(b).cents(), 50);

        assert!(Money::zero().is_zero());
        assert!(a.is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
