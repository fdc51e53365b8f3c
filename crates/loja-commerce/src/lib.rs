//! Cart pricing engine and storefront types for Loja, a multi-tenant
//! storefront platform.
//!
//! - **Catalog**: products and the [`catalog::Catalog`] provider trait
//! - **Cart**: lines merged per product/size/color, tiered discount pricing,
//!   persistence to a [`loja_cache::KeyValueStore`] under a per-loja key
//! - **Checkout**: read-only snapshot for the payment collaborator, coupons
//! - **Storefront**: explicit per-loja scope owning the cart
//!
//! # Example
//!
//! ```
//! use loja_commerce::prelude::*;
//! use loja_cache::MemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let settings = CartSettings::for_tenant("minha-loja");
//! let mut cart = Cart::open(&settings, store.clone()).unwrap();
//!
//! let vestido = Product::new("vestido", "Vestido Floral", Money::brl(10_000));
//! let bolsa = Product::new("bolsa", "Bolsa", Money::brl(16_000));
//! cart.add_item(&vestido, Some("M"), None).unwrap();
//! cart.add_item(&vestido, Some("M"), None).unwrap();
//! cart.add_item(&bolsa, None, Some("Caramelo")).unwrap();
//!
//! let pricing = cart.pricing();
//! assert_eq!(pricing.total_price, Money::brl(36_000));
//! assert_eq!(pricing.discount_percent, 50);
//! assert_eq!(pricing.final_price.display(), "R$ 180,00");
//!
//! // Reopening under the same key restores the lines.
//! let reopened = Cart::open(&settings, store).unwrap();
//! assert_eq!(reopened.lines(), cart.lines());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod storefront;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, RoundingMode};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, RoundingMode};

    // Catalog
    pub use crate::catalog::{Catalog, InMemoryCatalog, Product};

    // Cart
    pub use crate::cart::{
        Cart, CartBuilder, CartLine, CartPricing, DiscardReport, DiscountTier, TierProgress,
        TierSchedule,
    };

    // Checkout
    pub use crate::checkout::{AppliedCoupon, CheckoutSnapshot, Coupon, CouponValue};

    // Configuration and scope
    pub use crate::config::CartSettings;
    pub use crate::storefront::Storefront;
}
