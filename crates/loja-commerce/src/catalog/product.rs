//! Product records supplied by the catalog.

use crate::ids::ProductId;
use crate::money::{Money, RoundingMode};
use serde::{Deserialize, Serialize};

/// A product as published in a loja's catalog.
///
/// The cart keeps a copy of this record on each line; it never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Price before a catalog markdown (shown struck through).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Main image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Sizes on offer (e.g., "P", "M", "G").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    /// Colors on offer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

impl Product {
    /// Create a product with no variants.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            image: None,
            sizes: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Set the pre-markdown price.
    pub fn with_original_price(mut self, original_price: Money) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Set the sizes on offer.
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the colors on offer.
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Check if this product has size or color variants.
    pub fn has_variants(&self) -> bool {
        !self.sizes.is_empty() || !self.colors.is_empty()
    }

    /// Check if the product is marked down (original price above price).
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .map(|original| {
                original.currency == self.price.currency
                    && original.amount_cents > self.price.amount_cents
            })
            .unwrap_or(false)
    }

    /// Savings per unit against the original price; zero when not on sale.
    pub fn savings_per_unit(&self) -> Money {
        match self.original_price {
            Some(original) if self.is_on_sale() => {
                Money::new(original.amount_cents - self.price.amount_cents, self.price.currency)
            }
            _ => Money::zero(self.price.currency),
        }
    }

    /// Markdown percentage against the original price, rounded half-up.
    pub fn sale_percentage(&self) -> Option<u32> {
        let original = self.original_price.filter(|_| self.is_on_sale())?;
        let savings = i128::from(self.savings_per_unit().amount_cents) * 100;
        let percent = RoundingMode::HalfUp.divide(savings, i128::from(original.amount_cents));
        u32::try_from(percent).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_product_creation() {
        let product = Product::new("camiseta", "Camiseta Básica", Money::brl(4990));
        assert_eq!(product.id.as_str(), "camiseta");
        assert_eq!(product.name, "Camiseta Básica");
        assert!(!product.has_variants());
        assert!(!product.is_on_sale());
        assert_eq!(product.savings_per_unit(), Money::brl(0));
    }

    #[test]
    fn test_product_on_sale() {
        let product =
            Product::new("vestido", "Vestido", Money::brl(2000)).with_original_price(Money::brl(3000));

        assert!(product.is_on_sale());
        assert_eq!(product.savings_per_unit(), Money::brl(1000));
        assert_eq!(product.sale_percentage(), Some(33));
    }

    #[test]
    fn test_original_price_below_price_is_not_a_sale() {
        let product =
            Product::new("bone", "Boné", Money::brl(3000)).with_original_price(Money::brl(2500));
        assert!(!product.is_on_sale());
        assert_eq!(product.sale_percentage(), None);
    }

    #[test]
    fn test_original_price_in_other_currency_is_ignored() {
        let product = Product::new("bone", "Boné", Money::brl(3000))
            .with_original_price(Money::new(9000, Currency::USD));
        assert!(!product.is_on_sale());
    }

    #[test]
    fn test_product_variants() {
        let product = Product::new("tenis", "Tênis", Money::brl(19990))
            .with_sizes(["38", "39", "40"])
            .with_colors(["Preto"]);
        assert!(product.has_variants());
        assert_eq!(product.sizes.len(), 3);
    }

    #[test]
    fn test_optional_fields_default_when_missing() {
        let json = r#"{"id":"meia","name":"Meia","price":{"amount_cents":990,"currency":"BRL"}}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.original_price, None);
        assert!(product.sizes.is_empty());
    }
}
