//! mitto-connect library.
//!
//! Boot-time environment validation, the shared database client holder and
//! the shop repository with sealed offline access tokens.
//!
//! # Security
//!
//! Offline access tokens grant ongoing access to a merchant's store. They
//! are sealed with AES-256-GCM before they reach the database and are never
//! logged in plaintext.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
pub mod telemetry;
