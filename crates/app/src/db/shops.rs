//! Shop repository for database operations.
//!
//! [`ShopStore`] is the persistence seam; [`Database`] implements it against
//! `PostgreSQL` and [`super::MemoryShopStore`] in memory. [`ShopRepository`]
//! layers token sealing on top, so plaintext offline tokens never reach a
//! store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mitto_connect_core::{ShopDomain, ShopId};
use secrecy::SecretString;
use sqlx::types::Json;
use tracing::instrument;

use super::{Database, RepositoryError};
use crate::crypto::TokenCipher;
use crate::models::{JsonMap, SealedToken, Shop, ShopChanges};

// =============================================================================
// Store
// =============================================================================

/// Persistence operations for shop records.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Get a shop by its domain.
    async fn find_by_domain(&self, domain: &ShopDomain) -> Result<Option<Shop>, RepositoryError>;

    /// Insert the shop if absent, otherwise merge `changes` into it.
    async fn upsert(
        &self,
        domain: &ShopDomain,
        changes: ShopChanges,
    ) -> Result<Shop, RepositoryError>;
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: ShopId,
    domain: ShopDomain,
    token_offline: Option<SealedToken>,
    attributes: Json<JsonMap>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: row.id,
            domain: row.domain,
            token_offline: row.token_offline,
            attributes: row.attributes.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ShopStore for Database {
    async fn find_by_domain(&self, domain: &ShopDomain) -> Result<Option<Shop>, RepositoryError> {
        let pool = self.client().await?;
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, domain, token_offline, attributes, created_at, updated_at
            FROM shops
            WHERE domain = $1
            ",
        )
        .bind(domain)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Shop::from))
    }

    async fn upsert(
        &self,
        domain: &ShopDomain,
        changes: ShopChanges,
    ) -> Result<Shop, RepositoryError> {
        let pool = self.client().await?;
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            INSERT INTO shops (domain, attributes, token_offline)
            VALUES ($1, $2, $3)
            ON CONFLICT (domain) DO UPDATE SET
                attributes = shops.attributes || EXCLUDED.attributes,
                token_offline = COALESCE(EXCLUDED.token_offline, shops.token_offline),
                updated_at = NOW()
            RETURNING id, domain, token_offline, attributes, created_at, updated_at
            ",
        )
        .bind(domain)
        .bind(Json(&changes.attributes))
        .bind(changes.token_offline.as_ref())
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for shop records and their sealed offline tokens.
pub struct ShopRepository<'a> {
    store: &'a dyn ShopStore,
    cipher: &'a dyn TokenCipher,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(store: &'a dyn ShopStore, cipher: &'a dyn TokenCipher) -> Self {
        Self { store, cipher }
    }

    /// Get a shop by its domain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip_all, fields(shop = %domain))]
    pub async fn find_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<Shop>, RepositoryError> {
        self.store.find_by_domain(domain).await
    }

    /// Create the shop with `data`, or merge `data` into the existing shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidInput` if `data` sets a reserved key
    /// (`id`, `domain`, or the offline token), and `RepositoryError::Database`
    /// if the query fails.
    #[instrument(skip_all, fields(shop = %domain))]
    pub async fn upsert_by_domain(
        &self,
        domain: &ShopDomain,
        data: JsonMap,
    ) -> Result<Shop, RepositoryError> {
        let changes = ShopChanges::attributes(data);

        let reserved = changes.reserved_keys();
        if !reserved.is_empty() {
            return Err(RepositoryError::InvalidInput(format!(
                "reserved shop fields cannot be upserted: {}",
                reserved.join(", ")
            )));
        }

        let shop = self.store.upsert(domain, changes).await?;
        tracing::debug!(shop_id = %shop.id, "Shop upserted");
        Ok(shop)
    }

    /// Seal `token` and store it as the shop's offline token.
    ///
    /// Creates the shop if it does not exist yet. Other fields are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Crypto` if sealing fails (nothing is written)
    /// and `RepositoryError::Database` if the query fails.
    #[instrument(skip_all, fields(shop = %domain))]
    pub async fn save_offline_token(
        &self,
        domain: &ShopDomain,
        token: &str,
    ) -> Result<Shop, RepositoryError> {
        let sealed = self.cipher.seal(token)?;
        let shop = self
            .store
            .upsert(domain, ShopChanges::offline_token(sealed))
            .await?;
        tracing::info!(shop_id = %shop.id, "Offline token saved");
        Ok(shop)
    }

    /// Read and open the shop's offline token.
    ///
    /// Returns `None` if the shop does not exist or has no token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Crypto` if the stored value cannot be opened
    /// and `RepositoryError::Database` if the query fails.
    #[instrument(skip_all, fields(shop = %domain))]
    pub async fn load_offline_token(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<SecretString>, RepositoryError> {
        let Some(sealed) = self
            .store
            .find_by_domain(domain)
            .await?
            .and_then(|shop| shop.token_offline)
        else {
            return Ok(None);
        };

        Ok(Some(self.cipher.open(&sealed)?))
    }
}
