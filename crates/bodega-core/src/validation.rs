//! # Validation Module
//!
//! Input validation utilities for the Bodega order core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (out of scope)                                     │
//! │  └── Basic shape checks before requests reach the core                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── phone format, quantity bounds, cart unit cap, coordinates         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                             │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_CART_UNITS;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a contact phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - 8 to 15 digits, nothing else
///
/// ## Example
/// ```rust
/// use bodega_core::validation::validate_phone;
///
/// assert!(validate_phone("+5355512345").is_ok());
/// assert!(validate_phone("55512345").is_ok());
/// assert!(validate_phone("not-a-phone").is_err());
/// assert!(validate_phone("").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits after an optional '+'".to_string(),
        });
    }

    if digits.len() < 8 || digits.len() > 15 {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: 8,
            max: 15,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed the cart unit cap on its own
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_CART_UNITS {
        return Err(ValidationError::CartLimitExceeded { max: MAX_CART_UNITS });
    }

    Ok(())
}

/// Validates that adding `adding` units to a cart already holding
/// `current_units` stays within the per-cart cap.
///
/// ## User Workflow
/// ```text
/// Cart holds 3 units ── add 2 more ──► 5 ≤ 5  → OK
/// Cart holds 4 units ── add 2 more ──► 6 > 5  → CartLimitExceeded
/// ```
pub fn validate_cart_units(current_units: i64, adding: i64) -> ValidationResult<()> {
    validate_quantity(adding)?;

    if current_units + adding > MAX_CART_UNITS {
        return Err(ValidationError::CartLimitExceeded { max: MAX_CART_UNITS });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Coordinate Validators
// =============================================================================

/// Validates a latitude/longitude pair.
pub fn validate_coordinates(lat: f64, lon: f64) -> ValidationResult<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::OutOfRange {
            field: "latitude".to_string(),
            min: -90,
            max: 90,
        });
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::OutOfRange {
            field: "longitude".to_string(),
            min: -180,
            max: 180,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        // Valid
        assert!(validate_phone("+5355512345").is_ok());
        assert!(validate_phone("12345678").is_ok());
        assert!(validate_phone("123456789012345").is_ok());

        // Invalid
        assert!(validate_phone("").is_err());
        assert!(validate_phone("   ").is_err());
        assert!(validate_phone("1234567").is_err()); // too short
        assert!(validate_phone("1234567890123456").is_err()); // too long
        assert!(validate_phone("+").is_err());
        assert!(validate_phone("555-12345").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(6).is_err());
    }

    #[test]
    fn test_validate_cart_units() {
        assert!(validate_cart_units(0, 5).is_ok());
        assert!(validate_cart_units(3, 2).is_ok());

        assert!(validate_cart_units(4, 2).is_err());
        assert!(validate_cart_units(5, 1).is_err());
        assert!(validate_cart_units(0, 0).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(1_000).is_ok());
        assert!(validate_discount_bps(10_000).is_ok());
        assert!(validate_discount_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(23.114, -82.364).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }
}
