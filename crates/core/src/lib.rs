//! mitto-connect Core - Shared types library.
//!
//! This crate provides common types used across all mitto-connect components:
//! - `mitto-connect` - Configuration guard, database holder and shop repository
//! - `cli` - Command-line tools for environment checks, migrations and shop records
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for shop domains, shop IDs and the queue driver

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
