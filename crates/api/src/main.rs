use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use persistence::repositories::{ApiKeyRepository, RaceOrderRepository};
use regatta_admin_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Regatta Admin API v{}", env!("CARGO_PKG_VERSION"));

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    persistence::db::run_migrations(&pool).await?;

    let store = Arc::new(RaceOrderRepository::new(pool.clone()));
    let credentials = Arc::new(ApiKeyRepository::new(pool));

    let addr = config.socket_addr()?;
    let app = app::create_app(config, store, credentials);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
