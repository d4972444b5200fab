//! SmartIrrig - Backend Server entry point

use std::net::SocketAddr;

use smartirrig_server::{create_app, AppState, Config, SimulationService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartirrig_server=debug,shared=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting SmartIrrig Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        mode = %config.source.mode,
        interval_ms = config.simulation.tick_interval_ms,
        history_limit = config.simulation.history_limit,
        "Simulation settings"
    );

    let simulation = SimulationService::from_config(&config)?;
    if config.simulation.autostart {
        simulation.start();
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(simulation, config);

    // Build application
    let app = create_app(state.clone());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.simulation.stop();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
