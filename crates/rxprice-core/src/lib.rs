//! # rxprice-core: Prescription Refill Pricing
//!
//! Computes what a customer pays for a prescription order: refills times
//! unit price, less an optional subscription discount, less an optional
//! coupon.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Checkout frontend (TypeScript)                  │   │
//! │  │      PrescriptionOrder ──► PriceBreakdown (ts-rs bindings)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rxprice-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │   money   │  │  config   │  │ validation│  │   │
//! │  │   │  Pricer   │  │   Money   │  │  TOML/env │  │  strict   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO PERSISTENCE • NO NETWORK • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - `total_cost`, `subscription_discount`, `coupon_discount`, `Pricer`
//! - [`money`] - Money type with integer arithmetic (no floating point)
//! - [`types`] - Orders, breakdowns, discount rates, input policy
//! - [`config`] - Discount amounts and input policy (TOML + env)
//! - [`validation`] - Checks behind the strict input policy
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rxprice_core::{Money, Pricer, PrescriptionOrder};
//!
//! let order = PrescriptionOrder::new("diphenhydramine", Money::from_major(50), 1)
//!     .with_subscription(true);
//!
//! let breakdown = Pricer::default().price(&order);
//! assert_eq!(breakdown.total, Money::from_major(50));
//! assert_eq!(breakdown.amount_due(), Money::from_major_minor(37, 50));
//! ```

pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

pub use config::PricingConfig;
pub use error::{PricingError, PricingResult, ValidationError};
pub use money::Money;
pub use pricing::{coupon_discount, subscription_discount, total_cost, Pricer};
pub use types::*;

/// Subscription discount in basis points (25%).
pub const SUBSCRIPTION_DISCOUNT_BPS: u32 = 2500;

/// Flat coupon amount in cents (10.00).
pub const COUPON_DISCOUNT_CENTS: i64 = 1000;
