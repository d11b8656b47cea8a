//! In-memory shop store.
//!
//! Same merge semantics as the `PostgreSQL` store. Nothing survives a restart;
//! intended for tests and local tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use mitto_connect_core::{ShopDomain, ShopId};
use tokio::sync::Mutex;

use super::{RepositoryError, ShopStore};
use crate::models::{Shop, ShopChanges};

/// Shop store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryShopStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    shops: HashMap<ShopDomain, Shop>,
    last_id: i32,
}

impl MemoryShopStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shops.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.shops.len()
    }

    /// Whether no shop is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.shops.is_empty()
    }
}

#[async_trait]
impl ShopStore for MemoryShopStore {
    async fn find_by_domain(&self, domain: &ShopDomain) -> Result<Option<Shop>, RepositoryError> {
        Ok(self.inner.lock().await.shops.get(domain).cloned())
    }

    async fn upsert(
        &self,
        domain: &ShopDomain,
        changes: ShopChanges,
    ) -> Result<Shop, RepositoryError> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();

        if let Some(shop) = inner.shops.get_mut(domain) {
            changes.apply_to(shop);
            shop.updated_at = now;
            return Ok(shop.clone());
        }

        inner.last_id += 1;
        let shop = Shop {
            id: ShopId::new(inner.last_id),
            domain: domain.clone(),
            token_offline: changes.token_offline,
            attributes: changes.attributes,
            created_at: now,
            updated_at: now,
        };
        inner.shops.insert(domain.clone(), shop.clone());
        Ok(shop)
    }
}
