//! CLI subcommands.

pub mod import;
pub mod migrate;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;

use kitshop_storefront::config::{ConfigError, StorefrontConfig};
use kitshop_storefront::db::{self, RepositoryError};
use kitshop_storefront::services::import::ImportError;

/// Errors that make a command exit non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("import failed, nothing was written: {0}")]
    Import(#[from] ImportError),
}

/// Connect to the configured database and bring the schema up to date.
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = StorefrontConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;
    Ok(pool)
}
