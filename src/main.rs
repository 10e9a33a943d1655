//! Warehouse Server - equipment rental projects and booking calendar

use axum::{
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anyhow::Context;
use warehouse_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("warehouse_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Warehouse Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config).context("Failed to create services")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Projects
        .route(
            "/projects",
            get(api::projects::list_projects).post(api::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(api::projects::get_project).put(api::projects::update_project),
        )
        .route(
            "/projects/:id/items",
            get(api::project_items::get_project_items)
                .put(api::project_items::replace_project_items),
        )
        // Equipment
        .route(
            "/equipment",
            get(api::equipment::list_equipment).post(api::equipment::create_equipment),
        )
        .route("/equipment/:id", get(api::equipment::get_equipment))
        // Shortages
        .route("/shortages", get(api::shortages::get_shortages))
        // Calendar
        .route("/calendar", get(api::calendar::get_calendar))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    api::apply_layers(Router::new().nest("/api/v1", api_v1).merge(openapi))
}
