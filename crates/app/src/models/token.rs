//! Sealed (encrypted) offline token.

use serde::Serialize;

/// An offline access token in its encrypted, persistable form.
///
/// Only a [`TokenCipher`](crate::crypto::TokenCipher) in this crate or a row
/// read back from the database can produce one, so a plaintext token cannot
/// reach `shops.token_offline` through the store.
///
/// ```compile_fail
/// use mitto_connect::models::SealedToken;
///
/// let token = SealedToken::new("shpat_plaintext".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SealedToken(String);

impl SealedToken {
    pub(crate) const fn new(sealed: String) -> Self {
        Self(sealed)
    }

    /// Get the ciphertext as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SealedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl sqlx::Type<sqlx::Postgres> for SealedToken {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SealedToken {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for SealedToken {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
