//! # Money Module
//!
//! Provides the `Money` type for prescription prices and order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  A 25% subscription discount on $50.00 must be exactly $37.50.         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    5000 cents - 1250 cents = 3750 cents                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON / TypeScript            In memory                                 │
//! │  ─────────────────            ─────────                                 │
//! │  25      ── deserialize ──►   Money(2500)                               │
//! │  37.5    ◄── serialize ────   Money(3750)                               │
//! │                                                                         │
//! │  Callers speak currency units. Cents never leave the crate.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Fractional units are rounded to the nearest cent on the way in.
//!
//! ## Overflow
//! Every operation saturates at `Money::MIN` / `Money::MAX` instead of
//! panicking or wrapping. Use the `checked_*` variants to detect it.
//!
//! ## Usage
//! ```rust
//! use rxprice_core::money::Money;
//!
//! let price = Money::from_major(25);     // 25.00
//! let total = price * 3;                 // 75.00
//! assert_eq!(total.cents(), 7500);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::DiscountRate;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

/// Cents in one currency unit.
const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in cents.
///
/// Signed: a coupon larger than the subtotal, or a negative input under the
/// passthrough policy, produces a negative amount rather than a silent clamp
/// at zero.
///
/// Serialized as a number of currency units (`37.5`), not cents.
/// No display formatting is provided; the frontend owns presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    pub const MAX: Money = Money(i64::MAX);
    pub const MIN: Money = Money(i64::MIN);

    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use rxprice_core::money::Money;
    ///
    /// let half = Money::from_cents(3750); // 37.50
    /// assert_eq!(half.cents(), 3750);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use rxprice_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(10).cents(), 1000);
    /// ```
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units.saturating_mul(CENTS_PER_UNIT))
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        let major_cents = major.saturating_mul(CENTS_PER_UNIT);
        if major < 0 {
            Money(major_cents.saturating_sub(minor))
        } else {
            Money(major_cents.saturating_add(minor))
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a count, or `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies a unit price by a count, saturating on overflow.
    ///
    /// ```rust
    /// use rxprice_core::money::Money;
    ///
    /// let per_refill = Money::from_major(25);
    /// assert_eq!(per_refill.multiply_quantity(3), Money::from_major(75));
    /// assert_eq!(per_refill.multiply_quantity(0), Money::zero());
    /// assert_eq!(per_refill.multiply_quantity(i64::MAX), Money::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns the amount taken off by a percentage discount, rounded half
    /// away from zero to the nearest cent.
    ///
    /// ```rust
    /// use rxprice_core::money::Money;
    /// use rxprice_core::types::DiscountRate;
    ///
    /// let total = Money::from_major(80);
    /// let off = total.percentage_of(DiscountRate::from_bps(2500));
    /// assert_eq!(off, Money::from_major(20));
    /// ```
    pub fn percentage_of(&self, rate: DiscountRate) -> Money {
        // i128 keeps amount * bps from overflowing for any i64 amount
        let scaled = self.0 as i128 * rate.bps() as i128;
        let half = BPS_SCALE / 2;
        let rounded = if scaled < 0 {
            (scaled - half) / BPS_SCALE
        } else {
            (scaled + half) / BPS_SCALE
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Applies a percentage discount and returns the remaining amount.
    ///
    /// ```rust
    /// use rxprice_core::money::Money;
    /// use rxprice_core::types::DiscountRate;
    ///
    /// let total = Money::from_major(50);
    /// let discounted = total.apply_percentage_discount(DiscountRate::from_bps(2500));
    /// assert_eq!(discounted.cents(), 3750);
    /// ```
    pub fn apply_percentage_discount(&self, rate: DiscountRate) -> Money {
        *self - self.percentage_of(rate)
    }

    /// Converts a currency-unit amount (as sent by the frontend) to cents.
    ///
    /// Returns `None` for NaN, infinities and amounts outside the i64 cent
    /// range.
    pub fn from_units_f64(units: f64) -> Option<Self> {
        let cents = (units * CENTS_PER_UNIT as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if !cents.is_finite() || cents >= i64::MAX as f64 || cents < i64::MIN as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a refill count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

// =============================================================================
// Serde (currency units on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % CENTS_PER_UNIT == 0 {
            serializer.serialize_i64(self.0 / CENTS_PER_UNIT)
        } else {
            serializer.serialize_f64(self.0 as f64 / CENTS_PER_UNIT as f64)
        }
    }
}

struct UnitsVisitor;

impl<'de> Visitor<'de> for UnitsVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in currency units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(CENTS_PER_UNIT)
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount {} is out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|units| units.checked_mul(CENTS_PER_UNIT))
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount {} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_units_f64(v).ok_or_else(|| E::custom(format!("amount {} is out of range", v)))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UnitsVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
