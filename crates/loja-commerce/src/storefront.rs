//! Per-loja storefront scope.
//!
//! A [`Storefront`] is constructed explicitly for one tenant and passed to
//! whatever handles that loja's requests. It owns the tenant's cart once one
//! is opened; asking for the cart before that fails with a configuration
//! error instead of handing back an unrelated or empty cart.

use crate::cart::Cart;
use crate::catalog::{Catalog, Product};
use crate::config::CartSettings;
use crate::error::CommerceError;
use crate::ids::{ProductId, TenantId};
use loja_cache::KeyValueStore;
use std::sync::Arc;

/// One loja's catalog and (optionally) its open cart.
pub struct Storefront {
    tenant: TenantId,
    catalog: Arc<dyn Catalog>,
    cart: Option<Cart>,
}

impl Storefront {
    /// Create a storefront scope with no cart yet.
    pub fn new(tenant: impl Into<TenantId>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            tenant: tenant.into(),
            catalog,
            cart: None,
        }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Open this loja's cart from `store`.
    ///
    /// `settings.tenant` must name this storefront's loja.
    pub fn open_cart(
        &mut self,
        settings: &CartSettings,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<&mut Cart, CommerceError> {
        if settings.tenant != self.tenant {
            return Err(CommerceError::Config(format!(
                "cart settings for loja {} used in storefront {}",
                settings.tenant, self.tenant
            )));
        }
        let cart = Cart::open(settings, store)?;
        tracing::debug!(tenant = %self.tenant, lines = cart.unique_line_count(), "cart opened");
        Ok(self.cart.insert(cart))
    }

    /// Attach an already built cart.
    pub fn attach_cart(&mut self, cart: Cart) {
        self.cart = Some(cart);
    }

    /// Check if a cart is open.
    pub fn has_cart(&self) -> bool {
        self.cart.is_some()
    }

    /// The open cart.
    pub fn cart(&self) -> Result<&Cart, CommerceError> {
        self.cart
            .as_ref()
            .ok_or_else(|| CommerceError::CartNotConfigured(self.tenant.to_string()))
    }

    /// The open cart, mutably.
    pub fn cart_mut(&mut self) -> Result<&mut Cart, CommerceError> {
        let tenant = &self.tenant;
        self.cart
            .as_mut()
            .ok_or_else(|| CommerceError::CartNotConfigured(tenant.to_string()))
    }

    /// Look up a product in this loja's catalog.
    pub fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.catalog
            .product(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Resolve a product from the catalog and add one unit to the cart.
    pub fn add_product(
        &mut self,
        id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        // Check the cart first so a missing cart is reported before a missing product.
        self.cart()?;
        let product = self.product(id)?;
        self.cart_mut()?.add_item(&product, size, color)
    }
}
