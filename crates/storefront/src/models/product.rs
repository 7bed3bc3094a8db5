//! Catalog product types.

use kitshop_core::{Price, ProductId};

/// Image shown when a product has no picture of its own.
pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub image_file: String,
    pub brand: Option<String>,
}

impl Product {
    /// Path of the product image under `/static`.
    #[must_use]
    pub fn image_url(&self) -> String {
        image_url(&self.image_file)
    }
}

/// Path of an image file under `/static`.
#[must_use]
pub fn image_url(image_file: &str) -> String {
    format!("/static/images/{image_file}")
}

/// A product that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub image_file: String,
    pub brand: Option<String>,
}

impl NewProduct {
    /// Build a new product, normalizing blank optional fields.
    ///
    /// Blank `description`/`brand` become `None` and a blank `image_file`
    /// falls back to [`DEFAULT_IMAGE_FILE`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: Price,
        description: Option<String>,
        image_file: Option<String>,
        brand: Option<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_owned(),
            price,
            description: non_blank(description),
            image_file: non_blank(image_file).unwrap_or_else(|| DEFAULT_IMAGE_FILE.to_owned()),
            brand: non_blank(brand),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
