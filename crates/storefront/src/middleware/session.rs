//! Session middleware configuration.
//!
//! Sets up SQLite-backed sessions using tower-sessions, plus typed access to
//! the cart stored in the session.

use std::time::Duration;

use sqlx::SqlitePool;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;
use crate::models::{Cart, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "kitshop_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with the SQLite store.
///
/// The `tower_sessions` table is created by [`crate::db::migrate`].
#[must_use]
pub fn create_session_layer(
    pool: &SqlitePool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore> {
    let store = SqliteStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Periodically delete expired session records. Runs until the task is dropped.
pub async fn delete_expired_sessions(pool: SqlitePool, period: Duration) {
    let store = SqliteStore::new(pool);
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;
        if let Err(e) = store.delete_expired().await {
            tracing::warn!(error = %e, "Failed to delete expired sessions");
        }
    }
}

/// Load the cart, or an empty one if the session has none.
///
/// # Errors
///
/// Returns an error if the session record cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart back into the session.
///
/// # Errors
///
/// Returns an error if the session record cannot be written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}
