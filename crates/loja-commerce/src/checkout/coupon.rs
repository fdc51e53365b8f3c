//! Loja coupons.

use crate::error::CommerceError;
use crate::money::{Money, RoundingMode};
use serde::{Deserialize, Serialize};

/// Value of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouponValue {
    /// Percentage off (0-100).
    Percentage(u32),
    /// Fixed amount off.
    Fixed(Money),
}

impl CouponValue {
    /// Discount for `amount`, never more than `amount` itself.
    pub fn calculate(&self, amount: &Money) -> Money {
        match self {
            CouponValue::Percentage(percent) => amount
                .percentage((*percent).min(100), RoundingMode::HalfUp)
                .unwrap_or_else(|| Money::zero(amount.currency)),
            CouponValue::Fixed(fixed) => {
                // Don't exceed the amount
                let capped = Money::new(fixed.amount_cents.max(0), amount.currency);
                capped.min(*amount)
            }
        }
    }
}

/// A coupon a loja hands out to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Code typed at checkout (matched case-insensitively).
    pub code: String,
    /// Discount granted.
    pub value: CouponValue,
    /// Minimum cart value after the tier discount.
    #[serde(default)]
    pub minimum_purchase: Option<Money>,
    /// Unix timestamp the coupon becomes valid.
    #[serde(default)]
    pub starts_at: Option<i64>,
    /// Unix timestamp after which the coupon is expired.
    #[serde(default)]
    pub ends_at: Option<i64>,
    /// Maximum number of uses (None = unlimited).
    #[serde(default)]
    pub usage_limit: Option<u32>,
    /// Current usage count.
    #[serde(default)]
    pub usage_count: u32,
    /// Whether the coupon is active.
    pub active: bool,
}

impl Coupon {
    /// Create a percentage coupon.
    pub fn percentage(code: impl Into<String>, percent: u32) -> Self {
        Self::with_value(code, CouponValue::Percentage(percent))
    }

    /// Create a fixed amount coupon.
    pub fn fixed_amount(code: impl Into<String>, amount: Money) -> Self {
        Self::with_value(code, CouponValue::Fixed(amount))
    }

    fn with_value(code: impl Into<String>, value: CouponValue) -> Self {
        Self {
            code: code.into(),
            value,
            minimum_purchase: None,
            starts_at: None,
            ends_at: None,
            usage_limit: None,
            usage_count: 0,
            active: true,
        }
    }

    /// Add a minimum purchase condition.
    pub fn with_minimum_purchase(mut self, amount: Money) -> Self {
        self.minimum_purchase = Some(amount);
        self
    }

    /// Add a usage limit.
    pub fn with_usage_limit(mut self, limit: u32) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    /// Set the validity window.
    pub fn valid_between(mut self, starts_at: Option<i64>, ends_at: Option<i64>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Check if `code` refers to this coupon.
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    /// Check if discount has been exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .map(|limit| self.usage_count >= limit)
            .unwrap_or(false)
    }

    /// Validate the coupon for a cart worth `amount` at time `now`.
    pub fn check(&self, amount: &Money, now: i64) -> Result<(), CommerceError> {
        if !self.active {
            return Err(CommerceError::InvalidCouponCode(self.code.clone()));
        }
        if self.starts_at.is_some_and(|starts| now < starts) {
            return Err(CommerceError::CouponNotStarted(self.code.clone()));
        }
        if self.ends_at.is_some_and(|ends| now > ends) {
            return Err(CommerceError::CouponExpired(self.code.clone()));
        }
        if self.is_exhausted() {
            return Err(CommerceError::CouponUsageLimitReached(self.code.clone()));
        }
        let denominated = match self.value {
            CouponValue::Fixed(fixed) => Some(fixed.currency),
            CouponValue::Percentage(_) => None,
        };
        if let Some(currency) = denominated
            .into_iter()
            .chain(self.minimum_purchase.map(|m| m.currency))
            .find(|currency| *currency != amount.currency)
        {
            return Err(CommerceError::CurrencyMismatch {
                expected: amount.currency.to_string(),
                got: currency.to_string(),
            });
        }
        if let Some(minimum) = self.minimum_purchase {
            if amount.amount_cents < minimum.amount_cents {
                return Err(CommerceError::CouponMinimumNotMet {
                    code: self.code.clone(),
                    minimum: minimum.display(),
                });
            }
        }
        Ok(())
    }

    /// Increment usage count.
    pub fn record_usage(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
    }
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_coupon() {
        let coupon = Coupon::percentage("BEMVINDO10", 10);
        assert_eq!(coupon.value.calculate(&Money::brl(18_000)), Money::brl(1_800));
    }

    #[test]
    fn test_fixed_coupon_capped() {
        let coupon = Coupon::fixed_amount("FRETE50", Money::brl(5_000));
        assert_eq!(coupon.value.calculate(&Money::brl(10_000)), Money::brl(5_000));
        assert_eq!(coupon.value.calculate(&Money::brl(3_000)), Money::brl(3_000));
    }

    #[test]
    fn test_code_is_case_insensitive() {
        let coupon = Coupon::percentage("BemVindo", 5);
        assert!(coupon.matches_code(" bemvindo "));
        assert!(!coupon.matches_code("outro"));
    }

    #[test]
    fn test_check_window() {
        let coupon = Coupon::percentage("JANELA", 5).valid_between(Some(100), Some(200));
        let amount = Money::brl(1_000);
        assert!(matches!(coupon.check(&amount, 50), Err(CommerceError::CouponNotStarted(_))));
        assert!(coupon.check(&amount, 150).is_ok());
        assert!(matches!(coupon.check(&amount, 250), Err(CommerceError::CouponExpired(_))));
    }

    #[test]
    fn test_check_usage_limit() {
        let mut coupon = Coupon::percentage("LIMITE", 5).with_usage_limit(1);
        assert!(coupon.check(&Money::brl(1_000), 0).is_ok());
        coupon.record_usage();
        assert!(matches!(
            coupon.check(&Money::brl(1_000), 0),
            Err(CommerceError::CouponUsageLimitReached(_))
        ));
    }

    #[test]
    fn test_check_minimum_and_active() {
        let mut coupon = Coupon::percentage("MINIMO", 5).with_minimum_purchase(Money::brl(10_000));
        assert!(matches!(
            coupon.check(&Money::brl(9_999), 0),
            Err(CommerceError::CouponMinimumNotMet { .. })
        ));
        assert!(coupon.check(&Money::brl(10_000), 0).is_ok());

        coupon.active = false;
        assert!(matches!(
            coupon.check(&Money::brl(10_000), 0),
            Err(CommerceError::InvalidCouponCode(_))
        ));
    }

    #[test]
    fn test_check_rejects_other_currency() {
        let coupon = Coupon::fixed_amount("DOLAR", Money::new(500, crate::money::Currency::USD));
        assert!(matches!(
            coupon.check(&Money::brl(10_000), 0),
            Err(CommerceError::CurrencyMismatch { expected, got }) if expected == "BRL" && got == "USD"
        ));
    }

    #[test]
    fn test_current_timestamp_is_after_epoch() {
        assert!(current_timestamp() > 0);
    }
}
