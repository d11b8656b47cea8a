//! Domain models for mitto-connect.

pub mod shop;
pub mod token;

pub use shop::{JsonMap, RESERVED_ATTRIBUTE_KEYS, Shop, ShopChanges};
pub use token::SealedToken;
