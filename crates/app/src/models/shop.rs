//! Shop record model.

use chrono::{DateTime, Utc};
use mitto_connect_core::{ShopDomain, ShopId};
use serde_json::Value;

use super::SealedToken;

/// Free-form shop attributes (a JSON object).
pub type JsonMap = serde_json::Map<String, Value>;

/// Attribute keys that name real columns and cannot be set as attributes.
pub const RESERVED_ATTRIBUTE_KEYS: &[&str] = &["id", "domain", "tokenOffline", "token_offline"];

/// A shop that installed the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    /// Database ID.
    pub id: ShopId,
    /// Unique shop domain.
    pub domain: ShopDomain,
    /// Sealed offline access token, if one was saved.
    pub token_offline: Option<SealedToken>,
    /// Upsert-supplied fields.
    pub attributes: JsonMap,
    /// When the shop was first stored.
    pub created_at: DateTime<Utc>,
    /// When the shop was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Look up a single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Whether an offline token is stored.
    #[must_use]
    pub const fn has_offline_token(&self) -> bool {
        self.token_offline.is_some()
    }
}

/// Changes applied by a single upsert.
///
/// Attributes are merged key by key into the stored object. The token is only
/// replaced when one is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopChanges {
    /// Attributes to merge.
    pub attributes: JsonMap,
    /// Replacement sealed token.
    pub token_offline: Option<SealedToken>,
}

impl ShopChanges {
    /// Changes that only merge attributes.
    #[must_use]
    pub fn attributes(attributes: JsonMap) -> Self {
        Self {
            attributes,
            token_offline: None,
        }
    }

    /// Changes that only replace the offline token.
    #[must_use]
    pub fn offline_token(token: SealedToken) -> Self {
        Self {
            attributes: JsonMap::new(),
            token_offline: Some(token),
        }
    }

    /// Reserved keys present in the attributes, if any.
    #[must_use]
    pub fn reserved_keys(&self) -> Vec<&str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .filter(|k| RESERVED_ATTRIBUTE_KEYS.contains(k))
            .collect()
    }

    /// Apply the changes to an existing record (without touching timestamps).
    pub fn apply_to(self, shop: &mut Shop) {
        shop.attributes.extend(self.attributes);
        if let Some(token) = self.token_offline {
            shop.token_offline = Some(token);
        }
    }
}
