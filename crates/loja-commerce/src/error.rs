//! Commerce error types.

use loja_cache::CacheError;
use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Malformed persisted cart state is never reported here: it is recovered
/// inside the cart engine. Storage failures pass through untouched.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A cart was requested from a storefront scope that never opened one.
    #[error("No cart configured for loja {0}; open one with Storefront::open_cart")]
    CartNotConfigured(String),

    /// Invalid coupon code.
    #[error("Invalid coupon code: {0}")]
    InvalidCouponCode(String),

    /// Coupon expired.
    #[error("Coupon expired: {0}")]
    CouponExpired(String),

    /// Coupon not active yet.
    #[error("Coupon not active yet: {0}")]
    CouponNotStarted(String),

    /// Coupon usage limit reached.
    #[error("Coupon usage limit reached: {0}")]
    CouponUsageLimitReached(String),

    /// Cart value below the coupon minimum.
    #[error("Coupon {code} requires a minimum purchase of {minimum}")]
    CouponMinimumNotMet { code: String, minimum: String },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::Config(e.to_string())
    }
}
