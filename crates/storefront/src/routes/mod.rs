//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Catalog (search + brand filter)
//! GET  /home                     - Same as /
//! GET  /product/{id}             - Product detail
//! GET  /health                   - Liveness
//! GET  /health/ready             - Readiness (pings the database)
//!
//! # Cart (session)
//! GET  /add_to_cart/{id}         - Add one unit, redirect back
//! GET  /cart                     - Cart page
//! GET  /clear_cart               - Empty the cart
//! GET  /remove_from_cart/{id}    - Drop one line
//!
//! # Admin
//! GET  /admin_login              - Login page
//! POST /admin_login              - Login action
//! GET  /admin_logout             - Logout action
//! GET  /admin_dashboard          - Product table (requires admin)
//! GET  /admin/add_product        - Product form (requires admin)
//! POST /admin/add_product        - Create product (requires admin)
//! GET  /admin/bulk_add           - CSV upload form (requires admin)
//! POST /admin/bulk_add           - Import CSV (requires admin)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod products;

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::state::AppState;

/// Largest accepted CSV upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/add_to_cart/{id}", get(cart::add))
        .route("/remove_from_cart/{id}", get(cart::remove))
        .route("/clear_cart", get(cart::clear))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin_login", get(auth::login_page).post(auth::login))
        .route("/admin_logout", get(auth::logout))
        .route("/admin_dashboard", get(admin::dashboard))
        .route(
            "/admin/add_product",
            get(admin::add_product_page).post(admin::add_product),
        )
        .route(
            "/admin/bulk_add",
            get(admin::bulk_add_page)
                .post(admin::bulk_add)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        .route("/home", get(home::home))
        .route("/product/{id}", get(products::show))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(cart_routes())
        .merge(admin_routes())
}
