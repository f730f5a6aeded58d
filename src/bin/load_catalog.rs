//! Reload the local store product catalog from a JSON file.
//!
//! The file holds an array of products:
//! `[{"store": "Coles", "product_name": "...", "product_price": 2.4,
//!    "product_link": "...", "product_category": "..."}]`.
//! Saved recipes and meal plans are left alone.

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing::{info, warn};

use meal_planner::db;

#[derive(Parser)]
#[command(name = "load-catalog")]
#[command(about = "Replace the store product catalog with the contents of a JSON file", long_about = None)]
struct Cli {
    /// JSON file with the products to load
    file: PathBuf,

    /// Database URL; defaults to DATABASE_URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meal_planner=info,load_catalog=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read catalog file {}", cli.file.display()))?;
    let products = db::parse_catalog(&raw)?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    db::init_database_schema(&pool).await?;

    let load = db::replace_catalog(&pool, &products).await?;
    if load.total > 0 && load.in_stock == 0 {
        warn!("No product in {} has a price above 0", cli.file.display());
    }

    info!(
        "Imported {} products ({} with valid prices)",
        load.total, load.in_stock
    );
    Ok(())
}
