//! Demo catalog used to populate an empty database.

use sqlx::SqlitePool;

use kitshop_core::Price;

use super::{ProductRepository, RepositoryError};
use crate::models::NewProduct;

/// The six football kits the shop starts with.
#[must_use]
pub fn demo_products() -> Vec<NewProduct> {
    [
        ("Real Madrid Home Kit", 79.99, "Home kit, 2024/25 season", "real-madrid.jpg", "Adidas"),
        ("Barcelona Away Kit", 75.00, "Away kit, 2024/25 season", "barcelona.jpg", "Nike"),
        ("Manchester United Home Kit", 82.50, "Home kit, 2024/25 season", "man-united.jpg", "Adidas"),
        ("Bayern Munich Home Kit", 78.00, "Home kit, 2024/25 season", "bayern.jpg", "Adidas"),
        ("PSG Away Kit", 76.00, "Away kit, 2024/25 season", "psg.jpg", "Nike"),
        ("PSG Third Kit", 79.00, "Third kit, 2024/25 season", "psg-third.jpg", "Nike"),
    ]
    .into_iter()
    .map(|(name, price, description, image_file, brand)| {
        NewProduct::new(
            name,
            Price::new(price).unwrap_or(Price::ZERO),
            Some(description.to_owned()),
            Some(image_file.to_owned()),
            Some(brand.to_owned()),
        )
    })
    .collect()
}

/// Insert the demo catalog.
///
/// Unless `force` is set, nothing happens when the table already has rows.
/// Returns the number of inserted products.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if counting or inserting fails.
pub async fn seed_demo(pool: &SqlitePool, force: bool) -> Result<usize, RepositoryError> {
    let repo = ProductRepository::new(pool);

    if !force && repo.count().await? > 0 {
        tracing::debug!("Catalog already populated, skipping demo seed");
        return Ok(0);
    }

    let inserted = repo.create_many(&demo_products()).await?;
    tracing::info!(inserted, "Seeded demo catalog");
    Ok(inserted)
}
