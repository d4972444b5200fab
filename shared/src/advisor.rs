//! Rule-based irrigation advisor
//!
//! Produces the short recommendation shown next to a zone's charts. The
//! decision only looks at the drier of the bulk and surface moisture
//! readings, the valve state and whether it is raining.

use serde::{Deserialize, Serialize};

use crate::models::{
    classify_moisture, WeatherCondition, Zone, ZoneStatus, CRITICAL_MOISTURE, DRY_MOISTURE,
    SATURATED_MOISTURE,
};

/// Moisture above which an open valve should be closed (%)
pub const COMFORTABLE_MOISTURE: f64 = 70.0;

/// What the operator should do with the valve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdviceAction {
    OpenValve,
    KeepValveOpen,
    CloseValve,
    LightIrrigation,
    NoAction,
}

/// Recommendation for one zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationAdvice {
    pub zone_id: String,
    pub level: ZoneStatus,
    pub action: AdviceAction,
    pub message: String,
}

/// Compute the advice for a zone under the current weather
pub fn irrigation_advice(zone: &Zone, weather: &WeatherCondition) -> IrrigationAdvice {
    let moisture = zone.current_reading.driest_moisture();
    let raining = weather.condition.is_rainy();
    let valve_open = zone.is_valve_open;

    let (action, message) = if moisture < CRITICAL_MOISTURE {
        if valve_open {
            (
                AdviceAction::KeepValveOpen,
                format!(
                    "Critical: soil at {:.1}%. Irrigation is running on {}, keep the valve open until moisture is back above {:.0}%.",
                    moisture, zone.name, DRY_MOISTURE
                ),
            )
        } else {
            (
                AdviceAction::OpenValve,
                format!(
                    "Critical: soil at {:.1}% on {}. Open the valve now, the {} is under water stress.",
                    moisture,
                    zone.name,
                    zone.crop_type.to_string().to_lowercase()
                ),
            )
        }
    } else if moisture < DRY_MOISTURE {
        if valve_open {
            (
                AdviceAction::KeepValveOpen,
                format!(
                    "Soil is dry ({:.1}%) but irrigation is running. Keep watering.",
                    moisture
                ),
            )
        } else if raining {
            (
                AdviceAction::LightIrrigation,
                format!(
                    "Soil is dry ({:.1}%) and rain is falling. A short irrigation cycle is enough.",
                    moisture
                ),
            )
        } else {
            (
                AdviceAction::OpenValve,
                format!(
                    "Soil is dry ({:.1}%). Irrigate {} soon.",
                    moisture, zone.name
                ),
            )
        }
    } else if zone.current_reading.moisture > SATURATED_MOISTURE {
        if valve_open {
            (
                AdviceAction::CloseValve,
                format!(
                    "Soil is saturated ({:.1}%). Close the valve to avoid waterlogging.",
                    zone.current_reading.moisture
                ),
            )
        } else {
            (
                AdviceAction::NoAction,
                format!(
                    "Soil is saturated ({:.1}%). Hold irrigation until it drains.",
                    zone.current_reading.moisture
                ),
            )
        }
    } else if valve_open && moisture > COMFORTABLE_MOISTURE {
        (
            AdviceAction::CloseValve,
            format!(
                "Moisture is comfortable ({:.1}%). You can close the valve.",
                moisture
            ),
        )
    } else {
        (
            AdviceAction::NoAction,
            format!("All good: soil at {:.1}%, no action needed.", moisture),
        )
    };

    let level = if zone.current_reading.moisture > SATURATED_MOISTURE {
        ZoneStatus::Warning
    } else {
        classify_moisture(moisture)
    };

    IrrigationAdvice {
        zone_id: zone.id.clone(),
        level,
        action,
        message,
    }
}
