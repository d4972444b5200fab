//! Weather models

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::SensorReading;

/// Sky condition shared by every zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SkyCondition {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
}

impl SkyCondition {
    /// Ambient temperature applied when the condition is forced
    pub fn representative_temp(&self) -> f64 {
        match self {
            SkyCondition::Sunny => 30.0,
            SkyCondition::Cloudy => 24.0,
            SkyCondition::Rainy => 20.0,
        }
    }

    /// Baseline light level (lux) under this sky
    pub fn base_light(&self) -> f64 {
        match self {
            SkyCondition::Sunny => 800.0,
            SkyCondition::Cloudy => 300.0,
            SkyCondition::Rainy => 50.0,
        }
    }

    pub fn is_rainy(&self) -> bool {
        matches!(self, SkyCondition::Rainy)
    }
}

impl std::fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkyCondition::Sunny => write!(f, "Sunny"),
            SkyCondition::Cloudy => write!(f, "Cloudy"),
            SkyCondition::Rainy => write!(f, "Rainy"),
        }
    }
}

/// Error returned when parsing an unknown sky condition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown weather condition: {0}")]
pub struct UnknownCondition(pub String);

impl FromStr for SkyCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(SkyCondition::Sunny),
            "cloudy" => Ok(SkyCondition::Cloudy),
            "rainy" => Ok(SkyCondition::Rainy),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}

/// Process-wide environmental context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCondition {
    pub condition: SkyCondition,
    /// Ambient temperature (°C) all zone temperatures relax toward
    pub ambient_temp: f64,
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self {
            condition: SkyCondition::Sunny,
            ambient_temp: 25.0,
        }
    }
}

impl WeatherCondition {
    pub fn new(condition: SkyCondition, ambient_temp: f64) -> Self {
        Self {
            condition,
            ambient_temp,
        }
    }

    /// Force a condition, replacing the ambient temperature with the
    /// condition's representative value.
    pub fn force(&mut self, condition: SkyCondition) {
        self.condition = condition;
        self.ambient_temp = condition.representative_temp();
    }

    /// Derive the weather from a field reading reported by a live backend.
    ///
    /// Rain wins over light; below 200 lux the previous condition is kept.
    pub fn observe(&mut self, reading: &SensorReading) {
        self.ambient_temp = reading.temperature;
        if reading.rainfall {
            self.condition = SkyCondition::Rainy;
        } else if reading.light > 500.0 {
            self.condition = SkyCondition::Sunny;
        } else if reading.light > 200.0 {
            self.condition = SkyCondition::Cloudy;
        }
    }
}
