//! Pawmart Core - Shared types library.
//!
//! This crate provides common types used across all Pawmart components:
//! - `storefront` - Public marketplace API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the retail/wholesale price pair, session keys,
//!   and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
