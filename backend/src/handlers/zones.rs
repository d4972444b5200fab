//! HTTP handlers for zone endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{IrrigationAdvice, SensorReading, Zone};

use crate::error::AppResult;
use crate::services::Dashboard;
use crate::AppState;

/// Zones, weather and scheduler state in one payload
pub async fn get_dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.simulation.dashboard())
}

/// List all zones
pub async fn list_zones(State(state): State<AppState>) -> Json<Vec<Zone>> {
    Json(state.simulation.snapshot().zones)
}

/// Get a zone by ID
pub async fn get_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> AppResult<Json<Zone>> {
    let zone = state.simulation.zone(&zone_id)?;
    Ok(Json(zone))
}

/// Get a zone's reading history, oldest first
pub async fn get_zone_history(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> AppResult<Json<Vec<SensorReading>>> {
    let history = state.simulation.history(&zone_id)?;
    Ok(Json(history))
}

/// Get the irrigation advice for a zone
pub async fn get_zone_advice(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> AppResult<Json<IrrigationAdvice>> {
    let advice = state.simulation.advice(&zone_id)?;
    Ok(Json(advice))
}

/// Flip a zone's valve
pub async fn toggle_valve(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> AppResult<Json<Zone>> {
    let zone = state.simulation.toggle_valve(&zone_id).await?;
    Ok(Json(zone))
}
