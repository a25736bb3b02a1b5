use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{routes, settings::Settings, state::AppState};
use common::database::{DatabaseConfig, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Mealshare API service");

    let settings = Settings::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::new(
        settings.database_url.clone(),
        settings.database_max_connections,
    );
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply schema migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(common::error::DatabaseError::Migration)?;
    info!("Database migrations applied");

    let bind_addr = settings.bind_addr.clone();
    let app_state = AppState::new(pool, settings);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Mealshare API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
