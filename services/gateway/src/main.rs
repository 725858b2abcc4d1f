mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use anyhow::Context;
use config::GatewayConfig;
use relay_engine::{RelayEngine, RetentionSweeper};
use router::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    tracing::info!("Starting {} v{}", models::SERVICE_NAME, env!("CARGO_PKG_VERSION"));

    let config = GatewayConfig::from_env();
    let addr = config.socket_addr()?;

    // Initialize relay state and its background sweeper
    let engine = Arc::new(RelayEngine::new(config.relay.clone()));
    let sweeper = RetentionSweeper::spawn(Arc::clone(&engine));

    // Create router
    let app = create_router(AppState::new(engine));

    // Bind and serve
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Gateway stopped");

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
