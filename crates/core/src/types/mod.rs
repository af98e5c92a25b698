//! Core types for Pawmart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod session;
pub mod status;

pub use id::*;
pub use price::Price;
pub use session::SessionKey;
pub use status::*;
