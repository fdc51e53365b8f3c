//! Catalog provider trait and an in-memory implementation.

use crate::catalog::Product;
use crate::ids::ProductId;
use std::collections::HashMap;

/// Read-only source of product records for a loja.
pub trait Catalog {
    /// Look up a product by identifier.
    fn product(&self, id: &ProductId) -> Option<Product>;
}

/// Catalog held in memory, keyed by product ID.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, Product>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for InMemoryCatalog {
    fn from_iter<T: IntoIterator<Item = Product>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_lookup() {
        let catalog: InMemoryCatalog = [
            Product::new("a", "A", Money::brl(100)),
            Product::new("b", "B", Money::brl(200)),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.product(&ProductId::new("b")).map(|p| p.price),
            Some(Money::brl(200))
        );
        assert!(catalog.product(&ProductId::new("missing")).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(Product::new("a", "A", Money::brl(100)));
        catalog.insert(Product::new("a", "A", Money::brl(150)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.product(&ProductId::new("a")).map(|p| p.price),
            Some(Money::brl(150))
        );
    }
}
