//! Cart and cart line types.

use crate::cart::persist::{CartStorage, DiscardHook, DiscardReport};
use crate::cart::{CartPricing, TierSchedule};
use crate::catalog::Product;
use crate::config::CartSettings;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money, RoundingMode};
use loja_cache::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One product/variant combination in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// The product as it was when added.
    pub product: Product,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Selected size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Selected color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartLine {
    /// Create a new line.
    pub fn new(product: Product, quantity: u32, size: Option<String>, color: Option<String>) -> Self {
        Self {
            product,
            quantity,
            size,
            color,
        }
    }

    /// Check if this line is the one for (product, size, color).
    pub fn matches(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        &self.product.id == product_id
            && self.size.as_deref() == size
            && self.color.as_deref() == color
    }

    fn same_key(&self, other: &CartLine) -> bool {
        self.matches(&other.product.id, other.size.as_deref(), other.color.as_deref())
    }

    /// Unit price times quantity, in cents.
    pub fn line_total_cents(&self) -> i64 {
        self.product
            .price
            .amount_cents
            .saturating_mul(i64::from(self.quantity))
    }

    /// Markdown savings times quantity, in cents.
    pub fn line_savings_cents(&self) -> i64 {
        self.product
            .savings_per_unit()
            .amount_cents
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Check `product` can be priced in a cart of `currency`.
pub(crate) fn check_product(product: &Product, currency: Currency) -> Result<(), CommerceError> {
    if product.price.currency != currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: currency.to_string(),
            got: product.price.currency.to_string(),
        });
    }
    if product.price.is_negative() {
        return Err(CommerceError::ValidationError(format!(
            "product {} has a negative price ({} cents)",
            product.id, product.price.amount_cents
        )));
    }
    Ok(())
}

/// Fold `line` into `lines`, summing quantities when the key already exists.
pub(crate) fn merge_line(lines: &mut Vec<CartLine>, line: CartLine) {
    match lines.iter_mut().find(|existing| existing.same_key(&line)) {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
        None => lines.push(line),
    }
}

/// A loja shopping cart with tiered pricing.
///
/// When built with storage, every mutation writes the full line list to the
/// store under the cart's key and [`Cart::clear`] removes the key. Without
/// storage the cart lives only in memory.
///
/// All totals are recomputed from the lines on every call. Every line is
/// priced in the cart currency; amounts are summed in cents.
pub struct Cart {
    lines: Vec<CartLine>,
    currency: Currency,
    tiers: TierSchedule,
    rounding: RoundingMode,
    storage: Option<CartStorage>,
}

impl Cart {
    /// Start building a cart.
    pub fn builder() -> CartBuilder {
        CartBuilder::new()
    }

    /// An empty cart with default tiers and no persistence.
    pub fn in_memory() -> Self {
        Self {
            lines: Vec::new(),
            currency: Currency::default(),
            tiers: TierSchedule::default(),
            rounding: RoundingMode::default(),
            storage: None,
        }
    }

    /// Open the cart described by `settings`, loading it from `store` when
    /// persistence is enabled.
    pub fn open(settings: &CartSettings, store: Arc<dyn KeyValueStore>) -> Result<Self, CommerceError> {
        settings.builder(store)?.build()
    }

    /// Add one unit of a product/variant.
    ///
    /// Merges into the matching line if there is one. Products priced in
    /// another currency or below zero are rejected.
    pub fn add_item(
        &mut self,
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        self.add_item_quantity(product, 1, size, color)
    }

    /// Add `quantity` units of a product/variant. Zero is a no-op.
    pub fn add_item_quantity(
        &mut self,
        product: &Product,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        if quantity == 0 {
            return Ok(());
        }
        check_product(product, self.currency)?;

        merge_line(
            &mut self.lines,
            CartLine::new(
                product.clone(),
                quantity,
                size.map(str::to_string),
                color.map(str::to_string),
            ),
        );
        tracing::debug!(product = %product.id, quantity, ?size, ?color, "cart item added");
        self.persist()
    }

    /// Remove every line for the product/variant. No-op if absent.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        self.lines.retain(|line| !line.matches(product_id, size, color));
        tracing::debug!(product = %product_id, ?size, ?color, "cart item removed");
        self.persist()
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. Never creates a line.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return self.remove_item(product_id, size, color);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, size, color))
        {
            line.quantity = quantity;
            tracing::debug!(product = %product_id, quantity, "cart quantity updated");
        }
        self.persist()
    }

    /// Empty the cart and delete its stored entry.
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.lines.clear();
        if let Some(storage) = &self.storage {
            storage.remove()?;
        }
        Ok(())
    }

    /// Fold another cart's lines into this one (e.g., an anonymous cart at login).
    pub fn merge(&mut self, other: Cart) -> Result<(), CommerceError> {
        if other.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.to_string(),
                got: other.currency.to_string(),
            });
        }
        let merged = other.lines.len();
        for line in other.lines {
            merge_line(&mut self.lines, line);
        }
        tracing::debug!(merged, lines = self.lines.len(), "carts merged");
        self.persist()
    }

    fn persist(&self) -> Result<(), CommerceError> {
        match &self.storage {
            Some(storage) => storage.save(&self.lines),
            None => Ok(()),
        }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for (product, size, color), if any.
    pub fn line(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(product_id, size, color))
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn unique_line_count(&self) -> usize {
        self.lines.len()
    }

    /// Storage key, or `None` for an in-memory cart.
    pub fn storage_key(&self) -> Option<&str> {
        self.storage.as_ref().map(CartStorage::key)
    }

    /// Currency every line is priced in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Discount tiers applied to the subtotal.
    pub fn tiers(&self) -> &TierSchedule {
        &self.tiers
    }

    /// Rounding rule for the discount amount.
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Full pricing breakdown.
    pub fn pricing(&self) -> CartPricing {
        CartPricing::calculate(&self.lines, self.currency, &self.tiers, self.rounding)
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        self.pricing().total_items
    }

    /// Subtotal before discount.
    pub fn total_price(&self) -> Money {
        self.pricing().total_price
    }

    /// Tier discount percentage.
    pub fn discount_percent(&self) -> u32 {
        self.pricing().discount_percent
    }

    /// Tier discount amount.
    pub fn discount_amount(&self) -> Money {
        self.pricing().discount_amount
    }

    /// Amount payable after the tier discount.
    pub fn final_price(&self) -> Money {
        self.pricing().final_price
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .field("currency", &self.currency)
            .field("tiers", &self.tiers)
            .field("rounding", &self.rounding)
            .field("storage_key", &self.storage_key())
            .finish()
    }
}

/// Builder for [`Cart`].
pub struct CartBuilder {
    currency: Currency,
    tiers: TierSchedule,
    rounding: RoundingMode,
    storage: Option<(Arc<dyn KeyValueStore>, String)>,
    on_discard: Option<DiscardHook>,
}

impl CartBuilder {
    pub fn new() -> Self {
        Self {
            currency: Currency::default(),
            tiers: TierSchedule::default(),
            rounding: RoundingMode::default(),
            storage: None,
            on_discard: None,
        }
    }

    /// Set the cart currency.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the discount tiers.
    pub fn tiers(mut self, tiers: TierSchedule) -> Self {
        self.tiers = tiers;
        self
    }

    /// Set the half-cent rounding rule for the discount amount.
    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Persist the cart in `store` under `key`.
    pub fn storage(mut self, store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        self.storage = Some((store, key.into()));
        self
    }

    /// Observe persisted state discarded while loading.
    ///
    /// The callback is informational; recovery happens regardless.
    pub fn on_discard(mut self, hook: impl Fn(&DiscardReport) + 'static) -> Self {
        self.on_discard = Some(Box::new(hook));
        self
    }

    /// Build the cart, loading stored lines if storage is configured.
    pub fn build(self) -> Result<Cart, CommerceError> {
        let storage = self
            .storage
            .map(|(store, key)| CartStorage::new(store, key));
        let lines = match &storage {
            Some(storage) => storage.load(self.currency, self.on_discard.as_ref())?,
            None => Vec::new(),
        };

        Ok(Cart {
            lines,
            currency: self.currency,
            tiers: self.tiers,
            rounding: self.rounding,
            storage,
        })
    }
}

impl Default for CartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
