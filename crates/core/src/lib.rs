//! Kit Shop Core - Shared types library.
//!
//! This crate provides common types used across all Kit Shop components:
//! - `storefront` - Catalog, cart and admin panel web application
//! - `cli` - Command-line tools for migrations, seeding and CSV import
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
