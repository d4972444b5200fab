//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::SourceMode;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub mode: SourceMode,
    pub running: bool,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        mode: state.simulation.mode(),
        running: state.simulation.is_running(),
    })
}
