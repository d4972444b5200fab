//! Route definitions for the SmartIrrig API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/dashboard", get(handlers::get_dashboard))
        .nest("/zones", zone_routes())
        .route(
            "/weather",
            get(handlers::get_weather).put(handlers::set_weather),
        )
        .nest("/simulation", simulation_routes())
}

/// Zone routes
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_zones))
        .route("/:zone_id", get(handlers::get_zone))
        .route("/:zone_id/history", get(handlers::get_zone_history))
        .route("/:zone_id/advice", get(handlers::get_zone_advice))
        .route("/:zone_id/valve/toggle", post(handlers::toggle_valve))
}

/// Scheduler control routes
fn simulation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_simulation_status))
        .route("/start", post(handlers::start_simulation))
        .route("/stop", post(handlers::stop_simulation))
        .route("/tick", post(handlers::refresh_simulation))
}
