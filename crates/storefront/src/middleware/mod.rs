//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with SQLite store)
//! 5. Security headers (CSP, frame denial, etc.)
//!
//! Extractors built on the session: [`PageContext`] for layouts and
//! [`RequireAdmin`] for the admin panel.

pub mod auth;
pub mod flash;
pub mod page;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{RequireAdmin, clear_admin, is_admin, set_admin};
pub use flash::{push_flash, take_flashes};
pub use page::PageContext;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, load_cart, save_cart};
