//! Product catalog module.
//!
//! The catalog is owned outside the cart; the cart only reads products
//! through the [`Catalog`] provider trait.

mod product;
mod provider;

pub use product::Product;
pub use provider::{Catalog, InMemoryCatalog};
