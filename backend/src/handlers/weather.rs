//! HTTP handlers for the shared weather condition

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{SkyCondition, WeatherCondition};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Weather override request
#[derive(Debug, Deserialize)]
pub struct SetWeatherInput {
    pub condition: String,
}

/// Get the current weather
pub async fn get_weather(State(state): State<AppState>) -> Json<WeatherCondition> {
    Json(state.simulation.weather())
}

/// Force the weather condition
pub async fn set_weather(
    State(state): State<AppState>,
    Json(input): Json<SetWeatherInput>,
) -> AppResult<Json<WeatherCondition>> {
    let condition: SkyCondition = input.condition.parse().map_err(|_| AppError::Validation {
        field: "condition".to_string(),
        message: format!(
            "Unknown weather condition '{}', expected Sunny, Cloudy or Rainy",
            input.condition
        ),
        message_fr: format!(
            "Condition météo inconnue '{}', valeurs possibles : Sunny, Cloudy, Rainy",
            input.condition
        ),
    })?;

    let weather = state.simulation.set_weather(condition).await;
    Ok(Json(weather))
}
