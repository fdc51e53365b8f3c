//! Read-only cart snapshot handed to the payment collaborator.

use crate::cart::{Cart, CartLine};
use crate::checkout::coupon::{current_timestamp, Coupon};
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A coupon applied to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// The coupon code used.
    pub code: String,
    /// Amount discounted.
    pub amount: Money,
}

/// Everything checkout needs to build a payment request (e.g., a Pix charge).
///
/// Built from a cart at a point in time; later cart mutations do not affect
/// it. `amount_due` is `final_price` minus the coupon discount, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSnapshot {
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    pub total_price: Money,
    pub discount_percent: u32,
    pub discount_amount: Money,
    pub final_price: Money,
    pub coupon: Option<AppliedCoupon>,
    pub amount_due: Money,
}

impl CheckoutSnapshot {
    /// Capture the cart's lines and totals.
    pub fn from_cart(cart: &Cart) -> Self {
        let pricing = cart.pricing();
        Self {
            lines: cart.lines().to_vec(),
            total_items: pricing.total_items,
            total_price: pricing.total_price,
            discount_percent: pricing.discount_percent,
            discount_amount: pricing.discount_amount,
            final_price: pricing.final_price,
            coupon: None,
            amount_due: pricing.final_price,
        }
    }

    /// Check if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Apply a coupon on top of the tier-discounted price.
    pub fn apply_coupon(&mut self, coupon: &Coupon) -> Result<(), CommerceError> {
        self.apply_coupon_at(coupon, current_timestamp())
    }

    /// Apply a coupon, validating its time window against `now` (Unix seconds).
    ///
    /// Replaces any coupon applied before.
    pub fn apply_coupon_at(&mut self, coupon: &Coupon, now: i64) -> Result<(), CommerceError> {
        coupon.check(&self.final_price, now)?;

        let amount = coupon.value.calculate(&self.final_price);
        self.amount_due = self.final_price.try_subtract(&amount).ok_or_else(|| {
            CommerceError::CurrencyMismatch {
                expected: self.final_price.currency.to_string(),
                got: amount.currency.to_string(),
            }
        })?;
        self.coupon = Some(AppliedCoupon {
            code: coupon.code.clone(),
            amount,
        });
        tracing::debug!(code = %coupon.code, discount = amount.amount_cents, "coupon applied");
        Ok(())
    }

    /// Look up `code` among a loja's coupons and apply it.
    pub fn redeem(&mut self, coupons: &[Coupon], code: &str, now: i64) -> Result<(), CommerceError> {
        let coupon = coupons
            .iter()
            .find(|c| c.matches_code(code))
            .ok_or_else(|| CommerceError::InvalidCouponCode(code.trim().to_string()))?;
        self.apply_coupon_at(coupon, now)
    }

    /// Drop the applied coupon, if any.
    pub fn remove_coupon(&mut self) {
        self.coupon = None;
        self.amount_due = self.final_price;
    }
}

impl Cart {
    /// Snapshot the cart for checkout.
    pub fn checkout_snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot::from_cart(self)
    }
}
