//! String key-value storage for Loja cart persistence.
//!
//! Carts are serialized by the caller and handed to a [`KeyValueStore`] as
//! plain strings, keyed per loja (tenant). Two backends ship with the crate:
//!
//! - [`MemoryStore`]: in-process map, used for tests and server-side sessions
//! - [`Cache`]: Spin's Key-Value Store (only on `wasm32`)
//!
//! # Example
//!
//! ```
//! use loja_cache::{cache_key, KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let key = cache_key!("cart", "minha-loja");
//! assert_eq!(key, "cart:minha-loja");
//!
//! store.set(&key, "[]").unwrap();
//! assert_eq!(store.get(&key).unwrap().as_deref(), Some("[]"));
//!
//! store.remove(&key).unwrap();
//! assert_eq!(store.get(&key).unwrap(), None);
//! ```

mod error;
mod kv;
mod memory;

pub use error::CacheError;
#[cfg(target_arch = "wasm32")]
pub use kv::Cache;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, KeyValueStore, MemoryStore};
}
