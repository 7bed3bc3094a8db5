//! Domain models for storefront.
//!
//! - [`product`] - Catalog rows and validated inserts
//! - [`cart`] - The session-scoped shopping cart
//! - [`session`] - Session keys and flash messages

pub mod cart;
pub mod product;
pub mod session;

pub use cart::{Cart, CartItem};
pub use product::{DEFAULT_IMAGE_FILE, NewProduct, Product};
pub use session::{Flash, FlashLevel, keys as session_keys};
