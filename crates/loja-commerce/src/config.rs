//! Per-loja cart configuration.
//!
//! Settings are plain serde types so they can come from a TOML file, a JSON
//! tenant record, or be built in code. Every field has a default; a minimal
//! TOML document only names the tenant:
//!
//! ```toml
//! tenant = "minha-loja"
//! ```

use crate::cart::{CartBuilder, TierSchedule};
use crate::error::CommerceError;
use crate::ids::TenantId;
use crate::money::{Currency, RoundingMode};
use loja_cache::{cache_key, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default prefix for cart storage keys.
pub const DEFAULT_KEY_PREFIX: &str = "cart";

/// Cart settings for one loja.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSettings {
    /// Loja the cart belongs to; scopes the storage key.
    pub tenant: TenantId,
    /// Persist the cart. When false the cart is in-memory only.
    pub persist: bool,
    /// Prefix of the storage key (`<prefix>:<tenant>`).
    pub key_prefix: String,
    /// Cart currency.
    pub currency: Currency,
    /// Half-cent rounding for the discount amount.
    pub rounding: RoundingMode,
    /// Discount tiers.
    pub tiers: TierSchedule,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            tenant: TenantId::new(""),
            persist: true,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            currency: Currency::default(),
            rounding: RoundingMode::default(),
            tiers: TierSchedule::default(),
        }
    }
}

impl CartSettings {
    /// Persistent settings with defaults for a loja.
    pub fn for_tenant(tenant: impl Into<TenantId>) -> Self {
        Self {
            tenant: tenant.into(),
            ..Self::default()
        }
    }

    /// Turn persistence off (anonymous or preview sessions).
    pub fn in_memory(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Parse and validate settings from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, CommerceError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings can produce a usable storage key.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.tenant.as_str().trim().is_empty() {
            return Err(CommerceError::Config("tenant must not be empty".to_string()));
        }
        if self.tenant.as_str().contains(':') {
            return Err(CommerceError::Config(format!(
                "tenant {:?} must not contain ':'",
                self.tenant.as_str()
            )));
        }
        if self.persist && self.key_prefix.trim().is_empty() {
            return Err(CommerceError::Config(
                "key_prefix must not be empty when persist is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Storage key for this loja's cart, or `None` when not persisted.
    pub fn storage_key(&self) -> Option<String> {
        self.persist
            .then(|| cache_key!(self.key_prefix.as_str(), self.tenant))
    }

    /// A cart builder configured from these settings.
    pub fn builder(&self, store: Arc<dyn KeyValueStore>) -> Result<CartBuilder, CommerceError> {
        self.validate()?;
        let builder = CartBuilder::new()
            .currency(self.currency)
            .rounding(self.rounding)
            .tiers(self.tiers.clone());
        Ok(match self.storage_key() {
            Some(key) => builder.storage(store, key),
            None => builder,
        })
    }
}
