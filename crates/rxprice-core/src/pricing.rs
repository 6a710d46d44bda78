//! # Pricing Module
//!
//! The three pricing stages and the `Pricer` that composes them.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  price_per_refill, refills                                             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  total_cost            price × refills                  25 × 3 = 75    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  subscription_discount × 0.75 if subscribed             75 → 75        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  coupon_discount       − 10 if coupon                   75 → 65        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order matters: the coupon comes off the post-subscription subtotal.
//! Neither discount is idempotent, so each runs exactly once per order.
//!
//! ## Usage
//! ```rust
//! use rxprice_core::money::Money;
//! use rxprice_core::pricing::{coupon_discount, subscription_discount, total_cost};
//!
//! let total = total_cost(Money::from_major(50), 1);
//! let subtotal = subscription_discount(total, true);
//! let due = coupon_discount(subtotal, false);
//! assert_eq!(due, Money::from_major_minor(37, 50));
//! ```

use tracing::{debug, trace, warn};

use crate::config::PricingConfig;
use crate::money::Money;
use crate::types::{DiscountRate, InputPolicy, PriceBreakdown, PrescriptionOrder};
use crate::validation::validate_refill_line;
use crate::{COUPON_DISCOUNT_CENTS, SUBSCRIPTION_DISCOUNT_BPS};

// =============================================================================
// Pricing Stages
// =============================================================================

/// `price_per_refill × refills`. Inputs are not validated.
///
/// A product outside the i64 cent range saturates at `Money::MAX` (or
/// `Money::MIN`) and is logged at warn.
///
/// ```rust
/// use rxprice_core::money::Money;
/// use rxprice_core::pricing::total_cost;
///
/// assert_eq!(total_cost(Money::from_major(25), 3), Money::from_major(75));
/// assert_eq!(total_cost(Money::zero(), 3), Money::zero());
/// assert_eq!(total_cost(Money::from_major(25), 0), Money::zero());
/// ```
pub fn total_cost(price_per_refill: Money, refills: i64) -> Money {
    let total = match price_per_refill.checked_multiply_quantity(refills) {
        Some(total) => total,
        None => {
            warn!(
                price_cents = price_per_refill.cents(),
                refills,
                "Total cost overflowed, saturating"
            );
            price_per_refill.multiply_quantity(refills)
        }
    };
    trace!(
        price_cents = price_per_refill.cents(),
        refills,
        total_cents = total.cents(),
        "Total cost"
    );
    total
}

/// Total cost under an input policy.
///
/// With `RejectInvalid`, a negative price or refill count prices at zero.
///
/// ```rust
/// use rxprice_core::money::Money;
/// use rxprice_core::pricing::total_cost_with_policy;
/// use rxprice_core::types::InputPolicy;
///
/// let strict = InputPolicy::RejectInvalid;
/// assert_eq!(total_cost_with_policy(Money::from_major(-25), 3, strict), Money::zero());
/// assert_eq!(total_cost_with_policy(Money::from_major(25), 3, strict), Money::from_major(75));
/// ```
pub fn total_cost_with_policy(
    price_per_refill: Money,
    refills: i64,
    policy: InputPolicy,
) -> Money {
    if policy == InputPolicy::RejectInvalid {
        if let Err(reason) = validate_refill_line(price_per_refill, refills) {
            warn!(
                price_cents = price_per_refill.cents(),
                refills,
                %reason,
                "Rejected order line, pricing at zero"
            );
            return Money::zero();
        }
    }

    total_cost(price_per_refill, refills)
}

/// 25% off when `has_subscription`, else unchanged.
///
/// ```rust
/// use rxprice_core::money::Money;
/// use rxprice_core::pricing::subscription_discount;
///
/// assert_eq!(subscription_discount(Money::from_major(80), true), Money::from_major(60));
/// assert_eq!(subscription_discount(Money::from_major(80), false), Money::from_major(80));
/// ```
pub fn subscription_discount(total: Money, has_subscription: bool) -> Money {
    let rate = DiscountRate::from_bps(SUBSCRIPTION_DISCOUNT_BPS);
    apply_subscription(total, has_subscription, rate)
}

/// 10.00 off when `has_coupon`, else unchanged. No floor at zero.
///
/// ```rust
/// use rxprice_core::money::Money;
/// use rxprice_core::pricing::coupon_discount;
///
/// assert_eq!(coupon_discount(Money::from_major(60), true), Money::from_major(50));
/// assert_eq!(coupon_discount(Money::from_major(60), false), Money::from_major(60));
/// ```
pub fn coupon_discount(amount: Money, has_coupon: bool) -> Money {
    apply_coupon(amount, has_coupon, Money::from_cents(COUPON_DISCOUNT_CENTS))
}

fn apply_subscription(total: Money, has_subscription: bool, rate: DiscountRate) -> Money {
    if !has_subscription {
        return total;
    }

    let discounted = total.apply_percentage_discount(rate);
    trace!(
        total_cents = total.cents(),
        bps = rate.bps(),
        discounted_cents = discounted.cents(),
        "Subscription discount"
    );
    discounted
}

fn apply_coupon(amount: Money, has_coupon: bool, coupon: Money) -> Money {
    if !has_coupon {
        return amount;
    }

    let discounted = amount - coupon;
    trace!(
        amount_cents = amount.cents(),
        coupon_cents = coupon.cents(),
        discounted_cents = discounted.cents(),
        "Coupon discount"
    );
    discounted
}

// =============================================================================
// Pricer
// =============================================================================

/// Prices whole orders with configured discount amounts.
///
/// `Pricer::default()` matches the free functions above exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pricer {
    config: PricingConfig,
}

impl Pricer {
    pub fn new(config: PricingConfig) -> Self {
        Pricer { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn total_cost(&self, price_per_refill: Money, refills: i64) -> Money {
        total_cost_with_policy(price_per_refill, refills, self.config.input_policy)
    }

    pub fn subscription_discount(&self, total: Money, has_subscription: bool) -> Money {
        apply_subscription(total, has_subscription, self.config.subscription_rate())
    }

    pub fn coupon_discount(&self, amount: Money, has_coupon: bool) -> Money {
        apply_coupon(amount, has_coupon, self.config.coupon_amount())
    }

    /// Runs the full pipeline for one order.
    ///
    /// ```rust
    /// use rxprice_core::money::Money;
    /// use rxprice_core::pricing::Pricer;
    /// use rxprice_core::types::PrescriptionOrder;
    ///
    /// let order = PrescriptionOrder::new("acetaminophen", Money::from_major(25), 3)
    ///     .with_coupon(true);
    /// let breakdown = Pricer::default().price(&order);
    ///
    /// assert_eq!(breakdown.total, Money::from_major(75));
    /// assert_eq!(breakdown.after_subscription, Money::from_major(75));
    /// assert_eq!(breakdown.after_coupon, Money::from_major(65));
    /// ```
    pub fn price(&self, order: &PrescriptionOrder) -> PriceBreakdown {
        let total = self.total_cost(order.price_per_refill, order.refills);
        let after_subscription = self.subscription_discount(total, order.subscription);
        let after_coupon = self.coupon_discount(after_subscription, order.coupon);

        debug!(
            prescription = %order.prescription,
            total_cents = total.cents(),
            after_subscription_cents = after_subscription.cents(),
            after_coupon_cents = after_coupon.cents(),
            "Priced order"
        );

        PriceBreakdown {
            total,
            after_subscription,
            after_coupon,
        }
    }

    /// Prices several orders in sequence.
    pub fn price_all<'a, I>(&self, orders: I) -> Vec<PriceBreakdown>
    where
        I: IntoIterator<Item = &'a PrescriptionOrder>,
    {
        orders.into_iter().map(|order| self.price(order)).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscountSettings;

    fn units(n: i64) -> Money {
        Money::from_major(n)
    }

    #[test]
    fn test_total_cost_single_refill() {
        assert_eq!(total_cost(units(25), 1), units(25));
    }

    #[test]
    fn test_total_cost_multiple_refills() {
        assert_eq!(total_cost(units(25), 3), units(75));
    }

    #[test]
    fn test_total_cost_zero_cost_refill() {
        assert_eq!(total_cost(Money::zero(), 3), Money::zero());
    }

    #[test]
    fn test_total_cost_zero_refills() {
        assert_eq!(total_cost(units(25), 0), Money::zero());
    }

    #[test]
    fn test_total_cost_matches_product_over_grid() {
        for price in [0, 1, 7, 25, 99] {
            for refills in 0..10 {
                assert_eq!(total_cost(units(price), refills).cents(), price * 100 * refills);
            }
        }
    }

    #[test]
    fn test_total_cost_saturates_instead_of_panicking() {
        let total = total_cost(Money::from_cents(1_000_000), 10_000_000_000_000);
        assert_eq!(total, Money::MAX);

        let breakdown = Pricer::default().price(
            &PrescriptionOrder::new("bulk", Money::from_cents(1_000_000), 10_000_000_000_000)
                .with_subscription(true)
                .with_coupon(true),
        );
        assert_eq!(breakdown.total, Money::MAX);
        assert!(breakdown.after_coupon < breakdown.after_subscription);
    }

    #[test]
    fn test_total_cost_passthrough_propagates_negatives() {
        assert_eq!(total_cost(units(-25), 3), units(-75));
        assert_eq!(total_cost(units(25), -3), units(-75));
        assert_eq!(
            total_cost_with_policy(units(-25), 3, InputPolicy::Passthrough),
            units(-75)
        );
    }

    #[test]
    fn test_total_cost_reject_invalid_returns_zero() {
        let strict = InputPolicy::RejectInvalid;
        assert_eq!(total_cost_with_policy(units(-25), 3, strict), Money::zero());
        assert_eq!(total_cost_with_policy(units(25), -3, strict), Money::zero());
        assert_eq!(total_cost_with_policy(units(-25), -3, strict), Money::zero());
        assert_eq!(total_cost_with_policy(units(25), 3, strict), units(75));
        assert_eq!(total_cost_with_policy(Money::zero(), 0, strict), Money::zero());
    }

    #[test]
    fn test_subscription_discount() {
        assert_eq!(subscription_discount(units(80), true), units(60));
        assert_eq!(subscription_discount(units(80), false), units(80));
        assert_eq!(subscription_discount(units(50), true), Money::from_cents(3750));
    }

    #[test]
    fn test_coupon_discount() {
        assert_eq!(coupon_discount(units(60), true), units(50));
        assert_eq!(coupon_discount(units(60), false), units(60));
    }

    #[test]
    fn test_coupon_can_go_negative() {
        assert_eq!(coupon_discount(units(4), true), units(-6));
    }

    #[test]
    fn test_discounts_are_not_idempotent() {
        let once = subscription_discount(units(80), true);
        let twice = subscription_discount(once, true);
        assert_eq!(once, units(60));
        assert_eq!(twice, units(45));
        assert_ne!(once, twice);

        let once = coupon_discount(units(60), true);
        let twice = coupon_discount(once, true);
        assert_eq!(once, units(50));
        assert_eq!(twice, units(40));
        assert_ne!(once, twice);
    }

    #[test]
    fn test_pricer_applies_each_discount_once() {
        let order = PrescriptionOrder::new("phenylephrine", units(30), 5)
            .with_subscription(true)
            .with_coupon(true);
        let breakdown = Pricer::default().price(&order);
        assert_eq!(breakdown.total, units(150));
        assert_eq!(breakdown.after_subscription, Money::from_major_minor(112, 50));
        assert_eq!(breakdown.after_coupon, Money::from_major_minor(102, 50));
    }

    #[test]
    fn test_coupon_comes_off_discounted_subtotal() {
        // Coupon-first would give (80 - 10) × 0.75 = 52.50
        let order = PrescriptionOrder::new("ibuprofen", units(80), 1)
            .with_subscription(true)
            .with_coupon(true);
        let breakdown = Pricer::default().price(&order);
        assert_eq!(breakdown.after_coupon, units(50));
    }

    #[test]
    fn test_default_pricer_matches_free_functions() {
        let pricer = Pricer::default();
        assert_eq!(pricer.total_cost(units(25), 3), total_cost(units(25), 3));
        assert_eq!(
            pricer.subscription_discount(units(80), true),
            subscription_discount(units(80), true)
        );
        assert_eq!(pricer.coupon_discount(units(60), true), coupon_discount(units(60), true));
    }

    #[test]
    fn test_pricer_uses_configured_amounts() {
        let pricer = Pricer::new(PricingConfig {
            input_policy: InputPolicy::Passthrough,
            discounts: DiscountSettings {
                subscription_bps: 1000,
                coupon_cents: 500,
            },
        });
        assert_eq!(pricer.subscription_discount(units(80), true), units(72));
        assert_eq!(pricer.coupon_discount(units(60), true), units(55));
    }

    #[test]
    fn test_strict_pricer_zeroes_invalid_orders() {
        let pricer = Pricer::new(PricingConfig {
            input_policy: InputPolicy::RejectInvalid,
            ..PricingConfig::default()
        });
        let order = PrescriptionOrder::new("acetaminophen", units(25), -3).with_coupon(true);
        let breakdown = pricer.price(&order);
        assert_eq!(breakdown.total, Money::zero());
        // The coupon still applies to the zeroed total
        assert_eq!(breakdown.after_coupon, units(-10));
    }

    #[test]
    fn test_price_all_preserves_order() {
        let orders = vec![
            PrescriptionOrder::new("a", units(1), 1),
            PrescriptionOrder::new("b", units(2), 1),
        ];
        let breakdowns = Pricer::default().price_all(&orders);
        assert_eq!(breakdowns.len(), 2);
        assert_eq!(breakdowns[0].total, units(1));
        assert_eq!(breakdowns[1].total, units(2));
    }
}
