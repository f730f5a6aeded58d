use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meal_planner::api::{self, AppState};
use meal_planner::config::AppConfig;
use meal_planner::db;
use meal_planner::pricing::PriceResolver;

fn init_tracing() {
    // LOG_FORMAT=json switches to structured output; RUST_LOG filters as usual
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "meal_planner=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting meal planner service");

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    db::init_database_schema(&pool).await?;

    let resolver = PriceResolver::from_config(pool.clone(), &config.pricing)?;
    let app = api::router(AppState::new(pool, resolver));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
