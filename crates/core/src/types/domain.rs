//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty (after trimming).
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9.-]`.
    #[error("shop domain contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input has no dot separating labels.
    #[error("shop domain must contain at least one '.'")]
    MissingDot,
    /// The input starts or ends with '.' or '-'.
    #[error("shop domain cannot start or end with '.' or '-'")]
    BadEdge,
}

/// A shop's domain, the unique key of a shop record.
///
/// Input is trimmed and lower-cased before validation, so
/// `" Shop.Example.COM "` and `"shop.example.com"` name the same shop.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - Only ASCII letters, digits, '.' and '-'
/// - At least one '.'
/// - Must not start or end with '.' or '-'
///
/// ## Examples
///
/// ```
/// use mitto_connect_core::ShopDomain;
///
/// assert!(ShopDomain::parse("your-store.myshopify.com").is_ok());
/// assert!(ShopDomain::parse("shop.example.com").is_ok());
///
/// assert!(ShopDomain::parse("").is_err());              // empty
/// assert!(ShopDomain::parse("localhost").is_err());     // no dot
/// assert!(ShopDomain::parse("shop_1.example").is_err()); // underscore
/// assert!(ShopDomain::parse(".example.com").is_err());  // leading dot
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a domain name.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input:
    /// - Is empty
    /// - Is longer than 255 characters
    /// - Contains characters other than `[a-z0-9.-]`
    /// - Has no '.' or starts/ends with '.' or '-'
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let normalized = s.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = normalized
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '.' || *c == '-'))
        {
            return Err(ShopDomainError::InvalidCharacter(c));
        }

        if !normalized.contains('.') {
            return Err(ShopDomainError::MissingDot);
        }

        let edge = |c: char| c == '.' || c == '-';
        if normalized.starts_with(edge) || normalized.ends_with(edge) {
            return Err(ShopDomainError::BadEdge);
        }

        Ok(Self(normalized))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = ShopDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = ShopDomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ShopDomain> for String {
    fn from(domain: ShopDomain) -> Self {
        domain.0
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShopDomain {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShopDomain {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Only normalized domains are ever written
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShopDomain {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
