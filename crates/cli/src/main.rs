//! Kit Shop CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema and session-store migrations
//! kitshop migrate
//!
//! # Insert the demo catalog if the table is empty
//! kitshop seed
//!
//! # Insert the demo catalog even if products exist
//! kitshop seed --force
//!
//! # Import products from a CSV file (all rows or none)
//! kitshop import products.csv
//! ```
//!
//! All commands read the database location from `KITSHOP_DATABASE_URL`
//! (or `DATABASE_URL`), like the storefront binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kitshop")]
#[command(author, version, about = "Kit Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with demo products
    Seed {
        /// Insert even if the catalog already has products
        #[arg(short, long)]
        force: bool,
    },
    /// Import products from a CSV file
    Import {
        /// CSV file: header row, then name,price,description,image_file,brand
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CommandError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { force } => commands::seed::run(force).await?,
        Commands::Import { file } => commands::import::run(&file).await?,
    }
    Ok(())
}
