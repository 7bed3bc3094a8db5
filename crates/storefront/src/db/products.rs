//! Product repository for database operations.
//!
//! Queries are checked at runtime (`sqlx::query_as`) and mapped through
//! `FromRow` on [`Product`].

use sqlx::SqlitePool;

use kitshop_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, price, description, image_file, brand";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List products ordered by id, optionally restricted to one brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, brand: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let products = match brand {
            Some(brand) => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE brand = ? ORDER BY id"
                ))
                .bind(brand)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Distinct non-empty brands, sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn brands(&self) -> Result<Vec<String>, RepositoryError> {
        let brands = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT brand
            FROM products
            WHERE brand IS NOT NULL AND brand <> ''
            ORDER BY brand
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(brands)
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Insert one product and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products (name, price, description, image_file, brand)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(product.price)
        .bind(product.description.as_deref())
        .bind(&product.image_file)
        .bind(product.brand.as_deref())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(product_id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    /// Insert a batch of products in a single transaction.
    ///
    /// Either every row is committed or none is: the transaction rolls back
    /// when it is dropped on an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert or the commit fails.
    pub async fn create_many(&self, products: &[NewProduct]) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for product in products {
            sqlx::query(
                r"
                INSERT INTO products (name, price, description, image_file, brand)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(&product.name)
            .bind(product.price)
            .bind(product.description.as_deref())
            .bind(&product.image_file)
            .bind(product.brand.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(count = products.len(), "Products imported");
        Ok(products.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use kitshop_core::Price;

    use super::*;
    use crate::db;

    /// Fresh in-memory database with migrations applied.
    ///
    /// A single connection keeps every query on the same in-memory file.
    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::migrate(&pool).await.unwrap();
        pool
    }

    pub(crate) fn kit(name: &str, price: f64, brand: Option<&str>) -> NewProduct {
        NewProduct::new(
            name,
            Price::new(price).unwrap(),
            Some(format!("{name} description")),
            Some("kit.jpg".to_owned()),
            brand.map(str::to_owned),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo
            .create(&kit("Home Kit", 79.99, Some("Adidas")))
            .await
            .unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.brand.as_deref(), Some("Adidas"));
        assert!(repo.get(ProductId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_brand() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        repo.create(&kit("Home Kit", 79.99, Some("Adidas")))
            .await
            .unwrap();
        repo.create(&kit("Away Kit", 75.0, Some("Nike"))).await.unwrap();
        repo.create(&kit("Training Top", 30.0, None)).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 3);

        let nike = repo.list(Some("Nike")).await.unwrap();
        assert_eq!(nike.len(), 1);
        assert_eq!(nike[0].name, "Away Kit");
    }

    #[tokio::test]
    async fn test_brands_are_distinct_sorted_and_non_empty() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        repo.create(&kit("A", 1.0, Some("Nike"))).await.unwrap();
        repo.create(&kit("B", 1.0, Some("Adidas"))).await.unwrap();
        repo.create(&kit("C", 1.0, Some("Nike"))).await.unwrap();
        repo.create(&kit("D", 1.0, None)).await.unwrap();

        assert_eq!(repo.brands().await.unwrap(), vec!["Adidas", "Nike"]);
    }

    #[tokio::test]
    async fn test_create_many_commits_all_rows() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let inserted = repo
            .create_many(&[kit("A", 1.0, None), kit("B", 2.0, None)])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_many_rolls_back_on_failure() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        // Fails the second insert of the batch.
        sqlx::query(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON products \
             WHEN NEW.name = 'bad' BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
            .execute(&pool)
            .await
            .unwrap();

        let result = repo
            .create_many(&[kit("good", 1.0, None), kit("bad", 2.0, None)])
            .await;

        assert!(result.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
