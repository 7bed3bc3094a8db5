//! One-shot flash messages kept in the session until the next rendered page.

use tower_sessions::Session;

use crate::models::{Flash, session_keys};

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session record cannot be read or written.
pub async fn push_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    let mut queue = session
        .get::<Vec<Flash>>(session_keys::FLASHES)
        .await?
        .unwrap_or_default();
    queue.push(flash);
    session.insert(session_keys::FLASHES, queue).await
}

/// Remove and return every queued message, oldest first.
///
/// # Errors
///
/// Returns an error if the session record cannot be read or written.
pub async fn take_flashes(session: &Session) -> Result<Vec<Flash>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Flash>>(session_keys::FLASHES)
        .await?
        .unwrap_or_default())
}
