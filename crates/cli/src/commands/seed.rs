//! Seed the catalog with the demo football kits.

use kitshop_storefront::db::seed;

use super::{CommandError, connect};

/// Insert the demo products.
///
/// # Arguments
///
/// * `force` - Insert even when the catalog already has rows
///
/// # Errors
///
/// Returns an error if the database cannot be reached or the insert fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let pool = connect().await?;

    let inserted = seed::seed_demo(&pool, force).await?;
    if inserted == 0 {
        tracing::info!("Catalog already has products; use --force to add the demo set anyway");
    } else {
        tracing::info!(inserted, "Seeding complete!");
    }

    Ok(())
}
