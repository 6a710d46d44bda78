//! # Validation Module
//!
//! Checks backing the strict input policy and config validation.
//!
//! ```rust
//! use rxprice_core::money::Money;
//! use rxprice_core::validation::validate_refill_line;
//!
//! assert!(validate_refill_line(Money::from_major(25), 3).is_ok());
//! assert!(validate_refill_line(Money::from_major(-25), 3).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Basis points in 100%.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Price per refill must be >= 0. Zero is a free refill.
pub fn validate_price_per_refill(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price_per_refill".to_string(),
        });
    }

    Ok(())
}

/// Refill count must be >= 0. Zero refills is a valid, empty order.
pub fn validate_refills(refills: i64) -> ValidationResult<()> {
    if refills < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "refills".to_string(),
        });
    }

    Ok(())
}

/// Validates both halves of an order line, price first.
pub fn validate_refill_line(price: Money, refills: i64) -> ValidationResult<()> {
    validate_price_per_refill(price)?;
    validate_refills(refills)
}

/// A percentage discount must lie in 0..=100%.
pub fn validate_discount_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > MAX_DISCOUNT_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_DISCOUNT_BPS as i64,
        });
    }

    Ok(())
}

/// A flat discount must not be negative (that would be a surcharge).
pub fn validate_flat_discount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
