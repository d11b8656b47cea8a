//! Core types for mitto-connect.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod domain;
pub mod id;
pub mod queue;

pub use domain::{ShopDomain, ShopDomainError};
pub use id::ShopId;
pub use queue::QueueDriver;
