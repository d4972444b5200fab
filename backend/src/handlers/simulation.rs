//! HTTP handlers for the refresh scheduler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::SimulationStatus;
use crate::AppState;

/// Result of a start/stop/refresh command
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Whether the command changed anything
    pub changed: bool,
    pub status: SimulationStatus,
}

/// Get the scheduler status
pub async fn get_simulation_status(State(state): State<AppState>) -> Json<SimulationStatus> {
    Json(state.simulation.status().await)
}

/// Start periodic refresh
pub async fn start_simulation(State(state): State<AppState>) -> Json<CommandResponse> {
    let changed = state.simulation.start();
    Json(CommandResponse {
        changed,
        status: state.simulation.status().await,
    })
}

/// Stop periodic refresh
pub async fn stop_simulation(State(state): State<AppState>) -> Json<CommandResponse> {
    let changed = state.simulation.stop();
    Json(CommandResponse {
        changed,
        status: state.simulation.status().await,
    })
}

/// Run a single refresh cycle now
pub async fn refresh_simulation(State(state): State<AppState>) -> Json<CommandResponse> {
    let updated = state.simulation.refresh_now().await;
    Json(CommandResponse {
        changed: updated > 0,
        status: state.simulation.status().await,
    })
}
