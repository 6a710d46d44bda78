//! # Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricingError                                                           │
//! │  ├── Validation(ValidationError)  - order line rejected                │
//! │  ├── InvalidConfig                - config values out of range         │
//! │  ├── ConfigParse                  - malformed TOML                     │
//! │  └── ConfigRead                   - config file unreadable             │
//! │                                                                         │
//! │  ValidationError                                                        │
//! │  ├── MustBeNonNegative                                                  │
//! │  └── OutOfRange                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing functions themselves never return these: under the strict
//! input policy a rejected line prices at zero, and the `ValidationError` is
//! only logged.

use thiserror::Error;

/// Crate-level errors.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A config value is outside what the pricer accepts.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),
}

/// Order line validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Negative price or refill count.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
