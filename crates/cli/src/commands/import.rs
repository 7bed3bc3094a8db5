//! Import products from a CSV file.
//!
//! Uses the same rules as the admin upload: the header row is skipped, each
//! row needs exactly five fields, and the batch is committed only if every
//! row is valid.

use std::path::Path;

use kitshop_storefront::services::import;

use super::{CommandError, connect};

/// Import every row of `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any row is rejected.
pub async fn run(path: &Path) -> Result<(), CommandError> {
    if !import::is_csv_filename(&path.to_string_lossy()) {
        tracing::warn!(path = %path.display(), "File does not end in .csv, importing anyway");
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.display().to_string(),
            source,
        })?;

    let pool = connect().await?;

    tracing::info!(path = %path.display(), "Importing products...");
    let inserted = import::import_csv(&pool, &bytes).await?;
    tracing::info!(inserted, "Import complete!");

    Ok(())
}
