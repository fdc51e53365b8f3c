//! Cart persistence protocol.
//!
//! The cart is stored as a JSON array of lines under one key. Loading never
//! fails because of what is stored: an unparseable or non-array payload is
//! deleted and the cart starts empty, and individual entries that do not look
//! like a line are dropped. An entry also counts as malformed when its product
//! is priced in another currency than the cart or below zero. Only failures of
//! the store itself propagate.

use crate::cart::cart::{check_product, merge_line};
use crate::cart::CartLine;
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::money::Currency;
use loja_cache::KeyValueStore;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Persisted cart state that was thrown away while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReport {
    /// The stored payload is not JSON. The entry was removed.
    Unparseable { key: String, error: String },
    /// The stored payload is JSON but not an array. The entry was removed.
    NotASequence { key: String, found: &'static str },
    /// One array entry is not a valid line and was skipped.
    MalformedEntry {
        key: String,
        index: usize,
        reason: String,
    },
    /// The stored array had entries but none of them was a valid line. The
    /// entry was removed.
    NoUsableLines { key: String, dropped: usize },
}

impl DiscardReport {
    /// Storage key the discarded state was read from.
    pub fn key(&self) -> &str {
        match self {
            DiscardReport::Unparseable { key, .. }
            | DiscardReport::NotASequence { key, .. }
            | DiscardReport::MalformedEntry { key, .. }
            | DiscardReport::NoUsableLines { key, .. } => key,
        }
    }

    /// Check if the whole stored entry was dropped (as opposed to one line).
    pub fn removed_entry(&self) -> bool {
        !matches!(self, DiscardReport::MalformedEntry { .. })
    }
}

/// Callback observing discarded state.
pub type DiscardHook = Box<dyn Fn(&DiscardReport)>;

/// Shape a stored entry must have to become a line.
#[derive(Deserialize)]
struct StoredLine {
    product: Product,
    quantity: Value,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl StoredLine {
    fn into_line(self, currency: Currency) -> Result<CartLine, String> {
        check_product(&self.product, currency).map_err(|e| e.to_string())?;
        let quantity = self
            .quantity
            .as_u64()
            .filter(|q| *q >= 1)
            .and_then(|q| u32::try_from(q).ok())
            .ok_or_else(|| format!("quantity {} is not a positive integer", self.quantity))?;
        Ok(CartLine::new(self.product, quantity, self.size, self.color))
    }
}

fn decode_entry(entry: Value, currency: Currency) -> Result<CartLine, String> {
    serde_json::from_value::<StoredLine>(entry)
        .map_err(|e| e.to_string())?
        .into_line(currency)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A store plus the key a cart lives under.
pub(crate) struct CartStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStorage {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self { store, key }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Write the full line list.
    pub(crate) fn save(&self, lines: &[CartLine]) -> Result<(), CommerceError> {
        let payload = serde_json::to_string(lines)?;
        self.store.set(&self.key, &payload)?;
        tracing::debug!(key = %self.key, lines = lines.len(), bytes = payload.len(), "cart saved");
        Ok(())
    }

    /// Delete the stored entry.
    pub(crate) fn remove(&self) -> Result<(), CommerceError> {
        self.store.remove(&self.key)?;
        tracing::debug!(key = %self.key, "cart entry removed");
        Ok(())
    }

    /// Read and validate the stored lines for a cart priced in `currency`.
    pub(crate) fn load(
        &self,
        currency: Currency,
        on_discard: Option<&DiscardHook>,
    ) -> Result<Vec<CartLine>, CommerceError> {
        let Some(raw) = self.store.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no stored cart");
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                let report = DiscardReport::NotASequence {
                    key: self.key.clone(),
                    found: json_type(&other),
                };
                self.discard_entry(report, on_discard)?;
                return Ok(Vec::new());
            }
            Err(e) => {
                let report = DiscardReport::Unparseable {
                    key: self.key.clone(),
                    error: e.to_string(),
                };
                self.discard_entry(report, on_discard)?;
                return Ok(Vec::new());
            }
        };

        let stored = entries.len();
        let mut lines = Vec::with_capacity(stored);
        for (index, entry) in entries.into_iter().enumerate() {
            match decode_entry(entry, currency) {
                Ok(line) => merge_line(&mut lines, line),
                Err(reason) => {
                    tracing::warn!(key = %self.key, index, %reason, "dropping malformed cart line");
                    notify(
                        on_discard,
                        &DiscardReport::MalformedEntry {
                            key: self.key.clone(),
                            index,
                            reason,
                        },
                    );
                }
            }
        }

        if stored > 0 && lines.is_empty() {
            let report = DiscardReport::NoUsableLines {
                key: self.key.clone(),
                dropped: stored,
            };
            self.discard_entry(report, on_discard)?;
            return Ok(Vec::new());
        }

        tracing::debug!(key = %self.key, stored, loaded = lines.len(), "cart loaded");
        Ok(lines)
    }

    fn discard_entry(&self, report: DiscardReport, on_discard: Option<&DiscardHook>) -> Result<(), CommerceError> {
        tracing::warn!(key = %self.key, ?report, "discarding corrupt cart entry");
        self.store.remove(&self.key)?;
        notify(on_discard, &report);
        Ok(())
    }
}

fn notify(hook: Option<&DiscardHook>, report: &DiscardReport) {
    if let Some(hook) = hook {
        hook(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use loja_cache::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    const KEY: &str = "cart:loja-teste";

    fn storage_with(raw: Option<&str>) -> (Arc<MemoryStore>, CartStorage) {
        let store = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            store.set(KEY, raw).unwrap();
        }
        let storage = CartStorage::new(store.clone(), KEY.to_string());
        (store, storage)
    }

    fn recorder() -> (Rc<RefCell<Vec<DiscardReport>>>, DiscardHook) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, Box::new(move |r: &DiscardReport| sink.borrow_mut().push(r.clone())))
    }

    #[test]
    fn test_missing_entry_loads_empty() {
        let (_, storage) = storage_with(None);
        assert!(storage.load(Currency::BRL, None).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let (_, storage) = storage_with(None);
        let lines = vec![CartLine::new(
            Product::new("a", "A", Money::brl(1_000)),
            3,
            Some("M".to_string()),
            None,
        )];
        storage.save(&lines).unwrap();
        assert_eq!(storage.load(Currency::BRL, None).unwrap(), lines);
    }

    #[test]
    fn test_unparseable_payload_is_removed() {
        let (store, storage) = storage_with(Some("{not json"));
        let (seen, hook) = recorder();

        assert!(storage.load(Currency::BRL, Some(&hook)).unwrap().is_empty());
        assert_eq!(store.get(KEY).unwrap(), None);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], DiscardReport::Unparseable { .. }));
        assert!(seen[0].removed_entry());
    }

    #[test]
    fn test_object_payload_is_removed() {
        let (store, storage) = storage_with(Some(r#"{"items":[]}"#));
        let (seen, hook) = recorder();

        assert!(storage.load(Currency::BRL, Some(&hook)).unwrap().is_empty());
        assert_eq!(store.get(KEY).unwrap(), None);
        assert_eq!(
            seen.borrow()[0],
            DiscardReport::NotASequence {
                key: KEY.to_string(),
                found: "object",
            }
        );
    }

    #[test]
    fn test_array_of_strings_is_removed() {
        let (store, storage) = storage_with(Some(r#"["a","b"]"#));
        let (seen, hook) = recorder();

        assert!(storage.load(Currency::BRL, Some(&hook)).unwrap().is_empty());
        assert_eq!(store.get(KEY).unwrap(), None);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen[..2].iter().all(|r| !r.removed_entry()));
        assert_eq!(
            seen[2],
            DiscardReport::NoUsableLines {
                key: KEY.to_string(),
                dropped: 2,
            }
        );
        assert!(seen[2].removed_entry());
    }

    #[test]
    fn test_foreign_currency_and_negative_prices_are_dropped() {
        let raw = r#"[
            {"product":{"id":"a","name":"A","price":{"amount_cents":1000,"currency":"BRL"}},"quantity":1},
            {"product":{"id":"b","name":"B","price":{"amount_cents":20000,"currency":"USD"}},"quantity":1},
            {"product":{"id":"c","name":"C","price":{"amount_cents":-5000,"currency":"BRL"}},"quantity":3}
        ]"#;
        let (store, storage) = storage_with(Some(raw));
        let (seen, hook) = recorder();

        let lines = storage.load(Currency::BRL, Some(&hook)).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product.id.as_str(), "a");
        assert_eq!(seen.borrow().len(), 2);
        assert!(store.get(KEY).unwrap().is_some());
    }

    #[test]
    fn test_only_negative_prices_removes_entry() {
        let raw = r#"[{"product":{"id":"c","name":"C","price":{"amount_cents":-5000,"currency":"BRL"}},"quantity":3}]"#;
        let (store, storage) = storage_with(Some(raw));

        assert!(storage.load(Currency::BRL, None).unwrap().is_empty());
        assert_eq!(store.get(KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let raw = r#"[
            {"product":{"id":"a","name":"A","price":{"amount_cents":1000,"currency":"BRL"}},"quantity":2},
            {"product":{"id":"b"},"quantity":1},
            {"product":{"id":"c","name":"C","price":{"amount_cents":500,"currency":"BRL"}},"quantity":"3"},
            {"product":{"id":"d","name":"D","price":{"amount_cents":500,"currency":"BRL"}},"quantity":0},
            {"product":{"id":"e","name":"E","price":{"amount_cents":500,"currency":"BRL"}},"quantity":1.5},
            {"quantity":1},
            42
        ]"#;
        let (store, storage) = storage_with(Some(raw));
        let (seen, hook) = recorder();

        let lines = storage.load(Currency::BRL, Some(&hook)).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product.id.as_str(), "a");
        assert_eq!(lines[0].quantity, 2);

        let indexes: Vec<usize> = seen
            .borrow()
            .iter()
            .filter_map(|r| match r {
                DiscardReport::MalformedEntry { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indexes, vec![1, 2, 3, 4, 5, 6]);

        // Surviving lines keep the entry in place.
        assert!(store.get(KEY).unwrap().is_some());
    }

    #[test]
    fn test_empty_array_is_kept() {
        let (store, storage) = storage_with(Some("[]"));
        assert!(storage.load(Currency::BRL, None).unwrap().is_empty());
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_duplicate_keys_are_merged_on_load() {
        let raw = r#"[
            {"product":{"id":"a","name":"A","price":{"amount_cents":1000,"currency":"BRL"}},"quantity":2,"size":"M"},
            {"product":{"id":"a","name":"A","price":{"amount_cents":1000,"currency":"BRL"}},"quantity":3,"size":"M"}
        ]"#;
        let (_, storage) = storage_with(Some(raw));
        let lines = storage.load(Currency::BRL, None).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[test]
    fn test_remove_deletes_entry() {
        let (store, storage) = storage_with(Some("[]"));
        storage.remove().unwrap();
        assert!(store.is_empty());
    }
}
