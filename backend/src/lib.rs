//! SmartIrrig - Backend Server
//!
//! Serves the multi-zone irrigation simulator over HTTP and drives its
//! periodic refresh, either from the in-process simulation or from a
//! remote irrigation backend.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::SimulationService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub simulation: Arc<SimulationService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(simulation: SimulationService, config: Config) -> Self {
        Self {
            simulation: Arc::new(simulation),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "SmartIrrig API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
