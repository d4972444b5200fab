//! HTTP client for the remote irrigation backend
//!
//! The backend stores sensor records, decides whether the pump should run
//! and keeps the commanded valve state per zone.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{RainfallIntensity, SensorReading};

use crate::error::{AppError, AppResult};

/// Remote irrigation backend client
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

/// Payload of `POST /send-data`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DevicePayload {
    pub zone_id: String,
    pub humidity: f64,
    pub temperature: f64,
    pub soil_moisture: f64,
    pub soil_moisture_10cm: f64,
    pub soil_moisture_30cm: f64,
    pub soil_moisture_60cm: f64,
    pub light: f64,
    pub wind_speed: f64,
    pub rainfall: bool,
    pub rainfall_intensity: RainfallIntensity,
    pub pump_was_active: bool,
}

impl DevicePayload {
    pub fn new(zone_id: &str, reading: &SensorReading, pump_was_active: bool) -> Self {
        Self {
            zone_id: zone_id.to_string(),
            humidity: reading.humidity,
            temperature: reading.temperature,
            soil_moisture: reading.moisture,
            soil_moisture_10cm: reading.soil_moisture_10cm,
            soil_moisture_30cm: reading.soil_moisture_30cm,
            soil_moisture_60cm: reading.soil_moisture_60cm,
            light: reading.light,
            wind_speed: reading.wind_speed,
            rainfall: reading.rainfall,
            rainfall_intensity: reading.rainfall_intensity,
            pump_was_active,
        }
    }
}

/// Pump decision returned by `POST /send-data`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpDecision {
    pub pump: bool,
    #[serde(default)]
    pub message: String,
}

/// Body of `GET /valve-state/{zone_id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveState {
    #[serde(default)]
    pub valve_open: bool,
}

/// Body of `POST /toggle-valve`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveCommand {
    pub zone_id: String,
    pub valve_open: bool,
}

#[derive(Debug, Deserialize)]
struct CommandAck {
    #[serde(default)]
    message: String,
}

impl BackendClient {
    /// Create a client for the default local backend
    pub fn new() -> AppResult<Self> {
        Self::with_base_url("http://127.0.0.1:8000", Duration::from_secs(5))
    }

    /// Create a client with a custom base URL and request timeout
    pub fn with_base_url(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a zone's stored records, newest first
    pub async fn fetch_history(&self, zone_id: &str) -> AppResult<Vec<SensorReading>> {
        let url = format!("{}/history", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("zone_id", zone_id)])
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("history request failed: {}", e)))?;

        let response = Self::check_status(response, "history").await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse history: {}", e)))
    }

    /// Fetch the commanded valve state of a zone
    pub async fn fetch_valve_state(&self, zone_id: &str) -> AppResult<bool> {
        let url = format!("{}/valve-state/{}", self.base_url, zone_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("valve-state request failed: {}", e)))?;

        let response = Self::check_status(response, "valve-state").await?;
        let state: ValveState = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse valve state: {}", e)))?;
        Ok(state.valve_open)
    }

    /// Push one device sample and return the backend's pump decision
    pub async fn send_data(&self, payload: &DevicePayload) -> AppResult<PumpDecision> {
        let url = format!("{}/send-data", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("send-data request failed: {}", e)))?;

        let response = Self::check_status(response, "send-data").await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse pump decision: {}", e)))
    }

    /// Command a zone's valve. Returns the backend's acknowledgement message.
    pub async fn toggle_valve(&self, zone_id: &str, valve_open: bool) -> AppResult<String> {
        let url = format!("{}/toggle-valve", self.base_url);
        let command = ValveCommand {
            zone_id: zone_id.to_string(),
            valve_open,
        };
        let response = self
            .client
            .post(&url)
            .json(&command)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("toggle-valve request failed: {}", e)))?;

        let response = Self::check_status(response, "toggle-valve").await?;
        let ack: CommandAck = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse valve ack: {}", e)))?;
        Ok(ack.message)
    }

    async fn check_status(
        response: reqwest::Response,
        endpoint: &str,
    ) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Backend(format!(
            "{} returned {} - {}",
            endpoint, status, body
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_snake_case() {
        let mut reading = SensorReading::new(0, 41.0, 22.0, 63.0);
        reading.rainfall = true;
        reading.rainfall_intensity = RainfallIntensity::Moderate;
        let payload = DevicePayload::new("field1", &reading, true);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["zone_id"], "field1");
        assert_eq!(json["soil_moisture"], 41.0);
        assert_eq!(json["soil_moisture_10cm"], 41.0);
        assert_eq!(json["rainfall_intensity"], "moderate");
        assert_eq!(json["pump_was_active"], true);
    }

    #[test]
    fn test_history_record_parsing() {
        let body = r#"[{
            "id": 7, "zone_id": "field1", "created_at": "2024-06-15T10:00:00",
            "timestamp": 1718445600000, "moisture": 33.5, "temperature": 21.0,
            "humidity": 70.0, "soilMoisture10cm": 30.0, "soilMoisture30cm": 34.0,
            "soilMoisture60cm": 36.0, "light": 420.0, "windSpeed": 8.5,
            "rainfall": false, "rainfallIntensity": "none"
        }]"#;
        let records: Vec<SensorReading> = serde_json::from_str(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].soil_moisture_10cm, 30.0);
        assert_eq!(records[0].wind_speed, 8.5);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = BackendClient::with_base_url("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
