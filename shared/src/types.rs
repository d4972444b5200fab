//! Common types used across the platform

use serde::{Deserialize, Serialize};

use crate::models::{WeatherCondition, Zone};

/// Canonical history window: one day of hourly points
pub const DEFAULT_HISTORY_LIMIT: usize = 24;

/// Longer window used by the high-frequency dashboard variant
pub const EXTENDED_HISTORY_LIMIT: usize = 50;

/// Default interval between two simulation ticks (ms)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3000;

/// Full engine state as delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EngineSnapshot {
    pub zones: Vec<Zone>,
    pub weather: WeatherCondition,
}

impl EngineSnapshot {
    pub fn new(zones: &[Zone], weather: &WeatherCondition) -> Self {
        Self {
            zones: zones.to_vec(),
            weather: weather.clone(),
        }
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
