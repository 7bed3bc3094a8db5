//! Admin authentication extractor and session helpers.
//!
//! The admin login state is a single boolean flag in the session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::flash::push_flash;
use crate::error::AppError;
use crate::models::{Flash, session_keys};

/// Message shown when an admin page is requested without logging in.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Extractor that requires the admin flag in the session.
///
/// Without it the request is redirected to `/admin_login` with a flash message.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(_admin: RequireAdmin) -> impl IntoResponse {
///     "secret"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

/// Error returned when an admin page is requested without the flag.
pub enum AdminRejection {
    /// Redirect to the login form.
    RedirectToLogin,
    /// The session could not be read.
    Session(AppError),
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/admin_login").into_response(),
            Self::Session(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            AdminRejection::Session(AppError::Internal("session layer missing".to_string()))
        })?;

        let logged_in = is_admin(session)
            .await
            .map_err(|e| AdminRejection::Session(e.into()))?;
        if logged_in {
            return Ok(Self);
        }

        tracing::info!(path = %parts.uri.path(), "Admin page requested without login");
        push_flash(session, Flash::danger(LOGIN_REQUIRED_MESSAGE))
            .await
            .map_err(|e| AdminRejection::Session(e.into()))?;

        Err(AdminRejection::RedirectToLogin)
    }
}

/// Whether the session carries the admin flag.
///
/// # Errors
///
/// Returns an error if the session record cannot be read.
pub async fn is_admin(session: &Session) -> Result<bool, tower_sessions::session::Error> {
    Ok(session
        .get::<bool>(session_keys::ADMIN_LOGGED_IN)
        .await?
        .unwrap_or(false))
}

/// Set the admin flag after a successful login.
///
/// The session id is rotated first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::ADMIN_LOGGED_IN, true).await
}

/// Clear the admin flag (logout). The cart is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<bool>(session_keys::ADMIN_LOGGED_IN)
        .await?;
    Ok(())
}
