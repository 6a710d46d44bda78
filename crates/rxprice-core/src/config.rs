//! # Pricing Configuration
//!
//! Discount amounts and the input policy, resolved once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RXPRICE_SUBSCRIPTION_BPS=2500                                      │
//! │     RXPRICE_COUPON_CENTS=1000                                          │
//! │     RXPRICE_INPUT_POLICY=reject_invalid                                │
//! │                                                                         │
//! │  2. TOML Config File (path supplied by the caller)                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     25% subscription, 10.00 coupon, passthrough                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! input_policy = "passthrough"   # passthrough | reject_invalid
//!
//! [discounts]
//! subscription_bps = 2500
//! coupon_cents = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::PricingResult;
use crate::money::Money;
use crate::types::{DiscountRate, InputPolicy};
use crate::validation::{validate_discount_bps, validate_flat_discount};

pub const ENV_SUBSCRIPTION_BPS: &str = "RXPRICE_SUBSCRIPTION_BPS";
pub const ENV_COUPON_CENTS: &str = "RXPRICE_COUPON_CENTS";
pub const ENV_INPUT_POLICY: &str = "RXPRICE_INPUT_POLICY";

// =============================================================================
// Discount Settings
// =============================================================================

/// Subscription and coupon amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSettings {
    /// Subscription discount in basis points. Default: 2500 (25%).
    #[serde(default = "default_subscription_bps")]
    pub subscription_bps: u32,

    /// Flat coupon amount in cents. Default: 1000 (10.00).
    #[serde(default = "default_coupon_cents")]
    pub coupon_cents: i64,
}

fn default_subscription_bps() -> u32 {
    crate::SUBSCRIPTION_DISCOUNT_BPS
}

fn default_coupon_cents() -> i64 {
    crate::COUPON_DISCOUNT_CENTS
}

impl Default for DiscountSettings {
    fn default() -> Self {
        DiscountSettings {
            subscription_bps: default_subscription_bps(),
            coupon_cents: default_coupon_cents(),
        }
    }
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub input_policy: InputPolicy,

    #[serde(default)]
    pub discounts: DiscountSettings,
}

impl PricingConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> PricingResult<Self> {
        let config: PricingConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if a path is given and exists
    /// 3. `RXPRICE_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> PricingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> PricingResult<()> {
        validate_discount_bps("subscription_bps", self.discounts.subscription_bps)?;
        validate_flat_discount("coupon_cents", self.coupon_amount())?;
        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// `load`). Unparsable values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SUBSCRIPTION_BPS) {
            match raw.trim().parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding subscription discount from environment");
                    self.discounts.subscription_bps = bps;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_SUBSCRIPTION_BPS),
            }
        }

        if let Some(raw) = lookup(ENV_COUPON_CENTS) {
            match raw.trim().parse::<i64>() {
                Ok(cents) => {
                    debug!(cents, "Overriding coupon amount from environment");
                    self.discounts.coupon_cents = cents;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_COUPON_CENTS),
            }
        }

        if let Some(raw) = lookup(ENV_INPUT_POLICY) {
            match raw.parse::<InputPolicy>() {
                Ok(policy) => {
                    debug!(%policy, "Overriding input policy from environment");
                    self.input_policy = policy;
                }
                Err(e) => warn!(error = %e, "Ignoring invalid {}", ENV_INPUT_POLICY),
            }
        }
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn subscription_rate(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discounts.subscription_bps)
    }

    pub fn coupon_amount(&self) -> Money {
        Money::from_cents(self.discounts.coupon_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const ALL_ENV: [&str; 3] = [ENV_SUBSCRIPTION_BPS, ENV_COUPON_CENTS, ENV_INPUT_POLICY];

    fn clear_env() {
        for key in ALL_ENV {
            std::env::remove_var(key);
        }
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("pricing.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.input_policy, InputPolicy::Passthrough);
        assert_eq!(config.subscription_rate().bps(), 2500);
        assert_eq!(config.coupon_amount(), Money::from_major(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = PricingConfig::from_toml_str("").unwrap();
        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = PricingConfig::from_toml_str(
            r#"
            input_policy = "reject_invalid"

            [discounts]
            coupon_cents = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.input_policy, InputPolicy::RejectInvalid);
        assert_eq!(config.discounts.coupon_cents, 500);
        assert_eq!(config.discounts.subscription_bps, 2500);
    }

    #[test]
    fn test_toml_rejects_out_of_range_values() {
        let err =
            PricingConfig::from_toml_str("[discounts]\nsubscription_bps = 12000").unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));

        let err = PricingConfig::from_toml_str("[discounts]\ncoupon_cents = -100").unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[test]
    fn test_toml_rejects_unknown_policy() {
        let err = PricingConfig::from_toml_str(r#"input_policy = "sometimes""#).unwrap_err();
        assert!(matches!(err, PricingError::ConfigParse(_)));
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = PricingConfig::default();
        config.apply_overrides(lookup_from(&[
            (ENV_SUBSCRIPTION_BPS, "1500"),
            (ENV_COUPON_CENTS, "250"),
            (ENV_INPUT_POLICY, "strict"),
        ]));
        assert_eq!(config.discounts.subscription_bps, 1500);
        assert_eq!(config.discounts.coupon_cents, 250);
        assert_eq!(config.input_policy, InputPolicy::RejectInvalid);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = PricingConfig::default();
        config.apply_overrides(lookup_from(&[
            (ENV_SUBSCRIPTION_BPS, "a quarter"),
            (ENV_COUPON_CENTS, "10.00"),
            (ENV_INPUT_POLICY, "maybe"),
        ]));
        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let config = PricingConfig::load(Some(dir.path().join("missing.toml"))).unwrap();
        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_reads_file() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "input_policy = \"reject_invalid\"\n\n[discounts]\ncoupon_cents = 500\n",
        );

        let config = PricingConfig::load(Some(path)).unwrap();
        assert_eq!(config.input_policy, InputPolicy::RejectInvalid);
        assert_eq!(config.discounts.coupon_cents, 500);
        assert_eq!(config.discounts.subscription_bps, 2500);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[discounts]\nsubscription_bps = 1000\ncoupon_cents = 500\n",
        );
        std::env::set_var(ENV_COUPON_CENTS, "250");

        let result = PricingConfig::load(Some(path));
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.discounts.subscription_bps, 1000);
        assert_eq!(config.discounts.coupon_cents, 250);
    }

    #[test]
    #[serial]
    fn test_out_of_range_env_fails_validation() {
        clear_env();
        std::env::set_var(ENV_SUBSCRIPTION_BPS, "20000");

        let result = PricingConfig::load(None);
        let fallback = PricingConfig::load_or_default(None);
        clear_env();

        assert!(matches!(result, Err(PricingError::Validation(_))));
        assert_eq!(fallback, PricingConfig::default());
    }

    #[test]
    #[serial]
    fn test_unreadable_file_is_read_error() {
        clear_env();
        let dir = TempDir::new().unwrap();

        // The directory exists but cannot be read as a file
        let result = PricingConfig::load(Some(dir.path().to_path_buf()));
        assert!(matches!(result, Err(PricingError::ConfigRead(_))));
    }

    #[test]
    #[serial]
    fn test_malformed_file_falls_back_to_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[discounts\nsubscription_bps = ");

        assert!(matches!(
            PricingConfig::load(Some(path.clone())),
            Err(PricingError::ConfigParse(_))
        ));
        assert_eq!(PricingConfig::load_or_default(Some(path)), PricingConfig::default());
    }

    #[test]
    fn test_toml_serialization() {
        let config = PricingConfig {
            input_policy: InputPolicy::RejectInvalid,
            discounts: DiscountSettings {
                subscription_bps: 2000,
                coupon_cents: 1500,
            },
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("input_policy = \"reject_invalid\""));
        let parsed = PricingConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
