//! Database migration command.
//!
//! Applies the embedded migrations from `crates/storefront/migrations/` and
//! creates the session table. Already-applied migrations are skipped.

use super::{CommandError, connect};

/// Run all migrations against the configured database.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    tracing::info!("Running migrations...");
    connect().await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
