//! Per-request data every page layout needs.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::auth::is_admin;
use super::flash::take_flashes;
use super::session::load_cart;
use crate::error::AppError;
use crate::models::Flash;

/// Layout context: queued flashes, the admin flag and the cart badge.
///
/// Extracting it consumes the flash queue, so handlers that may redirect
/// instead of rendering should call [`PageContext::load`] only on the render
/// path.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub flashes: Vec<Flash>,
    pub is_admin: bool,
    pub cart_count: u32,
}

impl PageContext {
    /// Build the context from the session, draining the flash queue.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session record cannot be accessed.
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        Ok(Self {
            flashes: take_flashes(session).await?,
            is_admin: is_admin(session).await?,
            cart_count: load_cart(session).await?.item_count(),
        })
    }

    /// Add a message to show on the page being rendered.
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flashes.push(flash);
        self
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Self::load(session).await
    }
}
