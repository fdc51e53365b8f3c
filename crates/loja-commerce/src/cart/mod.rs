//! Shopping cart module.
//!
//! Contains the cart engine, its lines, tiered discount pricing and the
//! persistence protocol.

mod cart;
mod discount;
mod persist;
mod pricing;

pub use cart::{Cart, CartBuilder, CartLine};
pub use discount::{DiscountTier, TierProgress, TierSchedule, DEFAULT_TIERS};
pub use persist::{DiscardHook, DiscardReport};
pub use pricing::CartPricing;
