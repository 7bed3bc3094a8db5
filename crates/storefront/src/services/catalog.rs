//! Catalog browsing: name search and brand filter.

use sqlx::SqlitePool;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Query string of the catalog page (`?search=...&brand=...`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub brand: Option<String>,
}

impl CatalogQuery {
    /// Parse a raw query string. When a key repeats, its first value wins;
    /// unknown keys are ignored.
    #[must_use]
    pub fn from_query(raw: &str) -> Self {
        let mut query = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "search" => &mut query.search,
                "brand" => &mut query.brand,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        query
    }

    /// Trimmed search text, empty when absent.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_deref().map_or("", str::trim)
    }

    /// Trimmed brand, empty when absent.
    #[must_use]
    pub fn brand(&self) -> &str {
        self.brand.as_deref().map_or("", str::trim)
    }
}

/// Result of a catalog query.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Products matching both filters, ordered by id.
    pub products: Vec<Product>,
    /// Every distinct non-empty brand in the table, sorted.
    pub brands: Vec<String>,
    /// The search text as applied.
    pub search: String,
    /// The brand filter as applied.
    pub selected_brand: String,
}

/// Load the products matching `query` plus the brand list for the filter.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn browse(pool: &SqlitePool, query: &CatalogQuery) -> Result<Catalog, RepositoryError> {
    let repo = ProductRepository::new(pool);
    let search = query.search();
    let brand = query.brand();

    let mut products = repo.list(Some(brand).filter(|b| !b.is_empty())).await?;

    // SQLite's LIKE only folds ASCII, so the name match happens here.
    if !search.is_empty() {
        let needle = search.to_lowercase();
        products.retain(|product| name_matches(&product.name, &needle));
    }

    let brands = repo.brands().await?;

    Ok(Catalog {
        products,
        brands,
        search: search.to_owned(),
        selected_brand: brand.to_owned(),
    })
}

/// Case-insensitive substring test; `needle` must already be lowercase.
fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}
