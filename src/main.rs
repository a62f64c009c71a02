//! slot-gateway server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use slot_gateway::api;
use slot_gateway::app_state::AppState;
use slot_gateway::config::GameConfig;
use slot_gateway::domain::{PlayerRegistry, ThreadRngSource};
use slot_gateway::persistence::{LedgerStore, PostgresPersistence};
use slot_gateway::service::GameService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GameConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        min_bet = %config.rules.min_bet,
        persistence = config.persistence_enabled,
        "starting slot-gateway"
    );

    // Build persistence layer
    let store = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        let persistence = PostgresPersistence::new(pool);
        persistence.migrate().await?;
        LedgerStore::Postgres(persistence)
    } else {
        tracing::warn!("persistence disabled; accounts are kept in memory only");
        LedgerStore::InMemory
    };

    // Build service layer
    let registry = Arc::new(PlayerRegistry::new());
    let game_service = Arc::new(GameService::new(
        registry,
        store,
        Arc::new(ThreadRngSource),
        config.rules,
    ));
    game_service.restore().await?;

    // Build application state
    let app_state = AppState {
        game_service,
        history_page_size: config.history_page_size,
        chart_window_days: config.chart_window_days,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
