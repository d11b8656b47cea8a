//! Field-level encryption for offline access tokens.
//!
//! Repositories depend on the [`TokenCipher`] capability, never on a concrete
//! cipher. The production implementation is AES-256-GCM keyed from
//! `ENCRYPTION_KEY`.
//!
//! # Sealed format
//!
//! ```text
//! v1:<base64(nonce[12] || ciphertext || tag[16])>
//! ```
//!
//! A fresh random nonce is drawn for every seal, so sealing the same token
//! twice yields different strings.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::models::SealedToken;

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const SEALED_PREFIX: &str = "v1:";

/// Errors raised while sealing or opening tokens.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The configured key is not 32 bytes of hex or base64.
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    /// Encryption failed.
    #[error("encryption failed")]
    Encrypt,

    /// Authentication failed: wrong key or tampered ciphertext.
    #[error("decryption failed")]
    Decrypt,

    /// The sealed value is not in the expected format.
    #[error("malformed sealed token: {0}")]
    Malformed(String),
}

/// Seals and opens sensitive string fields.
pub trait TokenCipher: Send + Sync {
    /// Encrypt `plaintext` into its persistable form.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encrypt` if the cipher fails.
    fn seal(&self, plaintext: &str) -> Result<SealedToken, CryptoError>;

    /// Decrypt a value previously produced by [`TokenCipher::seal`].
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Malformed` for values not in the sealed format and
    /// `CryptoError::Decrypt` when authentication fails.
    fn open(&self, sealed: &SealedToken) -> Result<SecretString, CryptoError>;
}

/// Decode a 32-byte key given as 64 hex characters or base64.
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the input is neither encoding or does
/// not decode to exactly 32 bytes.
pub fn decode_key(encoded: &str) -> Result<[u8; KEY_LEN], CryptoError> {
    let trimmed = encoded.trim();

    let bytes = if trimmed.len() == KEY_LEN * 2 && trimmed.bytes().all(|b| b.is_ascii_hexdigit())
    {
        hex::decode(trimmed).map_err(|e| CryptoError::InvalidKey(e.to_string()))?
    } else {
        STANDARD
            .decode(trimmed)
            .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
            .map_err(|_| {
                CryptoError::InvalidKey("expected 64 hex characters or base64".to_string())
            })?
    };

    <[u8; KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
        CryptoError::InvalidKey(format!(
            "decodes to {} bytes, expected {KEY_LEN}",
            bytes.len()
        ))
    })
}

/// AES-256-GCM implementation of [`TokenCipher`].
///
/// Implements `Debug` manually so key material never reaches logs.
#[derive(Clone)]
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl AesGcmCipher {
    /// Create a cipher from raw key bytes.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Create a cipher from an encoded key (hex or base64).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` if the key cannot be decoded.
    pub fn from_encoded_key(encoded: &SecretString) -> Result<Self, CryptoError> {
        let key = decode_key(encoded.expose_secret())?;
        Ok(Self::new(&key))
    }
}

impl TokenCipher for AesGcmCipher {
    fn seal(&self, plaintext: &str) -> Result<SealedToken, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&ciphertext);

        Ok(SealedToken::new(format!(
            "{SEALED_PREFIX}{}",
            STANDARD.encode(payload)
        )))
    }

    fn open(&self, sealed: &SealedToken) -> Result<SecretString, CryptoError> {
        let encoded = sealed
            .as_str()
            .strip_prefix(SEALED_PREFIX)
            .ok_or_else(|| CryptoError::Malformed("missing version prefix".to_string()))?;

        let payload = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::Malformed(e.to_string()))?;
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::Malformed("payload too short".to_string()));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plaintext)
            .map(SecretString::from)
            .map_err(|_| CryptoError::Malformed("plaintext is not UTF-8".to_string()))
    }
}
