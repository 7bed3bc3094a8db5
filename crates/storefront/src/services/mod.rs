//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Admin credential check
//! - `catalog` - Product listing with search and brand filters
//! - `import` - Bulk product import from CSV

pub mod auth;
pub mod catalog;
pub mod import;
