//! Sensor reading models

use serde::{Deserialize, Serialize};

use crate::validation::clamp_percent;

/// Rain intensity reported alongside the rainfall flag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RainfallIntensity {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

impl std::fmt::Display for RainfallIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RainfallIntensity::None => write!(f, "none"),
            RainfallIntensity::Light => write!(f, "light"),
            RainfallIntensity::Moderate => write!(f, "moderate"),
            RainfallIntensity::Heavy => write!(f, "heavy"),
        }
    }
}

/// One timestamped snapshot of a zone's sensors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Soil moisture (%)
    pub moisture: f64,
    /// Soil temperature (°C)
    pub temperature: f64,
    /// Air humidity (%)
    pub humidity: f64,
    #[serde(default)]
    pub soil_moisture_10cm: f64,
    #[serde(default)]
    pub soil_moisture_30cm: f64,
    #[serde(default)]
    pub soil_moisture_60cm: f64,
    /// Light level (lux)
    #[serde(default)]
    pub light: f64,
    /// Wind speed (km/h)
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub rainfall: bool,
    #[serde(default)]
    pub rainfall_intensity: RainfallIntensity,
}

impl SensorReading {
    /// Build a reading from the three core values; soil depths mirror the
    /// bulk moisture and the remaining fields start dry and dark.
    pub fn new(timestamp: i64, moisture: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp,
            moisture,
            temperature,
            humidity,
            soil_moisture_10cm: moisture,
            soil_moisture_30cm: moisture,
            soil_moisture_60cm: moisture,
            light: 0.0,
            wind_speed: 0.0,
            rainfall: false,
            rainfall_intensity: RainfallIntensity::None,
        }
    }

    /// Force the value ranges every reading must respect.
    ///
    /// Percent fields are clamped to [0, 100], light and wind floored at 0,
    /// and the intensity is made consistent with the rainfall flag.
    pub fn normalize(&mut self) {
        self.moisture = clamp_percent(self.moisture);
        self.humidity = clamp_percent(self.humidity);
        self.soil_moisture_10cm = clamp_percent(self.soil_moisture_10cm);
        self.soil_moisture_30cm = clamp_percent(self.soil_moisture_30cm);
        self.soil_moisture_60cm = clamp_percent(self.soil_moisture_60cm);
        self.light = self.light.max(0.0);
        self.wind_speed = self.wind_speed.max(0.0);

        match (self.rainfall, self.rainfall_intensity) {
            (false, _) => self.rainfall_intensity = RainfallIntensity::None,
            (true, RainfallIntensity::None) => self.rainfall_intensity = RainfallIntensity::Light,
            _ => {}
        }
    }

    /// Builder-style variant of [`normalize`](Self::normalize)
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// The drier of the bulk and surface (10cm) moisture readings
    pub fn driest_moisture(&self) -> f64 {
        self.moisture.min(self.soil_moisture_10cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps_percent_fields() {
        let mut reading = SensorReading::new(0, 120.0, 30.0, -5.0);
        reading.soil_moisture_60cm = 101.0;
        reading.light = -3.0;
        reading.normalize();

        assert_eq!(reading.moisture, 100.0);
        assert_eq!(reading.humidity, 0.0);
        assert_eq!(reading.soil_moisture_60cm, 100.0);
        assert_eq!(reading.light, 0.0);
        // Temperature is not a percentage
        assert_eq!(reading.temperature, 30.0);
    }

    #[test]
    fn test_normalize_intensity_follows_rainfall() {
        let mut dry = SensorReading::new(0, 50.0, 20.0, 60.0);
        dry.rainfall_intensity = RainfallIntensity::Heavy;
        dry.normalize();
        assert_eq!(dry.rainfall_intensity, RainfallIntensity::None);

        let mut wet = SensorReading::new(0, 50.0, 20.0, 60.0);
        wet.rainfall = true;
        wet.normalize();
        assert_eq!(wet.rainfall_intensity, RainfallIntensity::Light);
    }

    #[test]
    fn test_wire_field_names() {
        let reading = SensorReading::new(1_700_000_000_000, 45.0, 24.0, 60.0);
        let json = serde_json::to_value(&reading).unwrap();

        assert!(json.get("soilMoisture10cm").is_some());
        assert!(json.get("windSpeed").is_some());
        assert_eq!(json["rainfallIntensity"], "none");
    }

    #[test]
    fn test_core_only_record_deserializes() {
        let json = r#"{"timestamp": 1, "moisture": 40.0, "temperature": 21.5, "humidity": 55.0}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.moisture, 40.0);
        assert!(!reading.rainfall);
        assert_eq!(reading.rainfall_intensity, RainfallIntensity::None);
    }
}
