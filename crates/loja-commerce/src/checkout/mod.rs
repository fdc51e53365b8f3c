//! Checkout module.
//!
//! The cart hands checkout a [`CheckoutSnapshot`]; coupons are applied to the
//! snapshot, never to the cart. Payment providers live outside this crate.

mod coupon;
mod snapshot;

pub use coupon::{Coupon, CouponValue};
pub use snapshot::{AppliedCoupon, CheckoutSnapshot};
