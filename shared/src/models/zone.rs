//! Irrigation zone models

use serde::{Deserialize, Serialize};

use super::SensorReading;

/// Moisture below which a zone is critical (%)
pub const CRITICAL_MOISTURE: f64 = 15.0;

/// Moisture below which a zone needs water (%)
pub const DRY_MOISTURE: f64 = 30.0;

/// Moisture above which a zone is waterlogged (%)
pub const SATURATED_MOISTURE: f64 = 90.0;

/// Crop grown in a zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CropType {
    Corn,
    Wheat,
    Tomato,
    Vineyard,
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropType::Corn => write!(f, "Corn"),
            CropType::Wheat => write!(f, "Wheat"),
            CropType::Tomato => write!(f, "Tomato"),
            CropType::Vineyard => write!(f, "Vineyard"),
        }
    }
}

/// Health of a zone derived from its soil moisture
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoneStatus {
    #[default]
    Optimal,
    Warning,
    Critical,
}

impl std::fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneStatus::Optimal => write!(f, "OPTIMAL"),
            ZoneStatus::Warning => write!(f, "WARNING"),
            ZoneStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Classify soil moisture into a zone status.
///
/// Evaluated as a cascade where later rules overwrite earlier ones:
/// dry (< 30) warns, very dry (< 15) is critical, waterlogged (> 90) warns.
pub fn classify_moisture(moisture: f64) -> ZoneStatus {
    let mut status = ZoneStatus::Optimal;
    if moisture < DRY_MOISTURE {
        status = ZoneStatus::Warning;
    }
    if moisture < CRITICAL_MOISTURE {
        status = ZoneStatus::Critical;
    }
    if moisture > SATURATED_MOISTURE {
        status = ZoneStatus::Warning;
    }
    status
}

/// A managed irrigation unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub crop_type: CropType,
    /// Surface in hectares
    pub area: f64,
    pub is_valve_open: bool,
    pub current_reading: SensorReading,
    /// Chronological, oldest first
    pub sensor_history: Vec<SensorReading>,
    pub status: ZoneStatus,
}

impl Zone {
    /// Create a zone from its seed with an empty history
    pub fn from_seed(seed: &ZoneSeed, timestamp: i64) -> Self {
        let current_reading =
            SensorReading::new(timestamp, seed.moisture, seed.temperature, seed.humidity)
                .normalized();
        let status = classify_moisture(current_reading.moisture);

        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            crop_type: seed.crop_type,
            area: seed.area,
            is_valve_open: seed.valve_open,
            current_reading,
            sensor_history: Vec::new(),
            status,
        }
    }

    /// Append a reading to the history and make it current.
    ///
    /// The history is a sliding window of at most `limit` readings; the
    /// oldest entries are dropped first.
    pub fn record(&mut self, reading: SensorReading, limit: usize) {
        self.sensor_history.push(reading.clone());
        trim_front(&mut self.sensor_history, limit);
        self.current_reading = reading;
        self.refresh_status();
    }

    /// Replace the whole history (chronological) and make its newest entry current
    pub fn replace_history(&mut self, mut history: Vec<SensorReading>, limit: usize) -> bool {
        trim_front(&mut history, limit);
        let Some(latest) = history.last().cloned() else {
            return false;
        };
        self.sensor_history = history;
        self.current_reading = latest;
        self.refresh_status();
        true
    }

    pub fn refresh_status(&mut self) {
        self.status = classify_moisture(self.current_reading.moisture);
    }
}

fn trim_front(history: &mut Vec<SensorReading>, limit: usize) {
    if history.len() > limit {
        let overflow = history.len() - limit;
        history.drain(..overflow);
    }
}

fn default_moisture() -> f64 {
    45.0
}

fn default_temperature() -> f64 {
    24.0
}

fn default_humidity() -> f64 {
    60.0
}

/// Construction-time description of a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneSeed {
    pub id: String,
    pub name: String,
    pub crop_type: CropType,
    pub area: f64,
    #[serde(default)]
    pub valve_open: bool,
    #[serde(default = "default_moisture")]
    pub moisture: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_humidity")]
    pub humidity: f64,
}

impl ZoneSeed {
    pub fn new(id: &str, name: &str, crop_type: CropType, area: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            crop_type,
            area,
            valve_open: false,
            moisture: default_moisture(),
            temperature: default_temperature(),
            humidity: default_humidity(),
        }
    }

    pub fn with_reading(mut self, moisture: f64, temperature: f64, humidity: f64) -> Self {
        self.moisture = moisture;
        self.temperature = temperature;
        self.humidity = humidity;
        self
    }
}

/// The zones a fresh installation starts with
pub fn default_zone_seeds() -> Vec<ZoneSeed> {
    vec![
        ZoneSeed::new("field1", "Main Field", CropType::Corn, 12.5),
        ZoneSeed::new("field2", "North Plot", CropType::Wheat, 8.0).with_reading(38.0, 23.0, 55.0),
        ZoneSeed::new("greenhouse", "Greenhouse", CropType::Tomato, 1.2)
            .with_reading(62.0, 26.0, 70.0),
        ZoneSeed::new("hillside", "Hillside Vines", CropType::Vineyard, 4.8)
            .with_reading(28.0, 25.0, 48.0),
    ]
}
