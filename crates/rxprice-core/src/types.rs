//! # Domain Types
//!
//! Values that flow through the pricing pipeline.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────────┐          ┌──────────────────────┐            │
//! │  │  PrescriptionOrder   │  price   │   PriceBreakdown     │            │
//! │  │  ──────────────────  │ ───────► │  ──────────────────  │            │
//! │  │  prescription        │          │  total               │            │
//! │  │  price_per_refill    │          │  after_subscription  │            │
//! │  │  refills             │          │  after_coupon        │            │
//! │  │  subscription, coupon│          └──────────────────────┘            │
//! │  └──────────────────────┘                                              │
//! │                                                                         │
//! │  ┌──────────────────────┐          ┌──────────────────────┐            │
//! │  │    DiscountRate      │          │     InputPolicy      │            │
//! │  │  bps (u32)           │          │  Passthrough         │            │
//! │  │  2500 = 25%          │          │  RejectInvalid       │            │
//! │  └──────────────────────┘          └──────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is persisted. Orders are priced and dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::PricingError;
use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage discount in basis points.
///
/// 1 basis point = 0.01%, so the subscription discount of 25% is 2500 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Input Policy
// =============================================================================

/// How `total_cost` treats negative inputs.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  PASSTHROUGH (default)               │  REJECT_INVALID (opt-in)         │
/// │  ─────────────────────               │  ───────────────────────         │
/// │  price × refills, no checks          │  negative price or refills → 0   │
/// │  (-25) × 3 = -75                     │  (-25) × 3 = 0, logged at warn   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Only the total is policed. The discounts still run on a rejected line's
/// zero total, so a rejected line with a coupon comes out at minus the coupon
/// amount (-10.00 by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InputPolicy {
    /// Inputs flow into the arithmetic unchecked.
    #[default]
    Passthrough,
    /// Negative price or refill count yields a zero total. A coupon on that
    /// line still applies, making the amount due negative.
    RejectInvalid,
}

impl fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputPolicy::Passthrough => write!(f, "passthrough"),
            InputPolicy::RejectInvalid => write!(f, "reject_invalid"),
        }
    }
}

impl FromStr for InputPolicy {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "passthrough" | "lenient" => Ok(InputPolicy::Passthrough),
            "reject_invalid" | "strict" => Ok(InputPolicy::RejectInvalid),
            other => Err(PricingError::InvalidConfig(format!(
                "Unknown input policy: '{}'. Valid options: passthrough, reject_invalid",
                other
            ))),
        }
    }
}

// =============================================================================
// Prescription Order
// =============================================================================

/// One prescription line with its discount flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PrescriptionOrder {
    /// Drug name, e.g. "acetaminophen".
    pub prescription: String,

    /// Price of a single refill, in currency units on the wire.
    pub price_per_refill: Money,

    /// Number of refills ordered.
    pub refills: i64,

    /// Customer has an active subscription (25% off).
    #[serde(default)]
    pub subscription: bool,

    /// Customer presented a coupon (flat amount off after the subscription).
    #[serde(default)]
    pub coupon: bool,
}

impl PrescriptionOrder {
    pub fn new(prescription: impl Into<String>, price_per_refill: Money, refills: i64) -> Self {
        PrescriptionOrder {
            prescription: prescription.into(),
            price_per_refill,
            refills,
            subscription: false,
            coupon: false,
        }
    }

    pub fn with_subscription(mut self, subscription: bool) -> Self {
        self.subscription = subscription;
        self
    }

    pub fn with_coupon(mut self, coupon: bool) -> Self {
        self.coupon = coupon;
        self
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// Every stage of the pricing pipeline for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceBreakdown {
    /// `price_per_refill × refills`.
    pub total: Money,
    /// Total after the subscription discount (equal to `total` without one).
    pub after_subscription: Money,
    /// Amount due: after the coupon (equal to `after_subscription` without one).
    pub after_coupon: Money,
}

impl PriceBreakdown {
    /// The amount the customer pays.
    #[inline]
    pub fn amount_due(&self) -> Money {
        self.after_coupon
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
