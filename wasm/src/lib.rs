//! WebAssembly module for SmartIrrig
//!
//! Runs the zone simulation entirely in the browser, for dashboards that
//! have no server to talk to:
//! - Engine stepping and valve/weather commands
//! - Zone status classification
//! - Diurnal history generation

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{
    classify_moisture, default_zone_seeds, irrigation_advice, seed_history, EngineOptions,
    SkyCondition, ZoneSimulationEngine, DEFAULT_HISTORY_LIMIT,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}

/// Browser-side simulation engine with the built-in zones
#[wasm_bindgen]
pub struct WasmEngine {
    engine: ZoneSimulationEngine,
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(rng_seed: Option<u32>, history_limit: Option<u32>) -> WasmEngine {
        let options = EngineOptions {
            history_limit: history_limit.map_or(DEFAULT_HISTORY_LIMIT, |l| l as usize),
            rng_seed: rng_seed.map(u64::from),
            ..EngineOptions::default()
        };
        WasmEngine {
            engine: ZoneSimulationEngine::new(&default_zone_seeds(), options),
        }
    }

    /// Advance one step at the browser's current time; returns the snapshot JSON
    pub fn tick(&mut self) -> Result<String, JsValue> {
        self.tick_at(js_sys::Date::now())
    }

    /// Advance one step stamped with `timestamp` (ms); returns the snapshot JSON
    pub fn tick_at(&mut self, timestamp: f64) -> Result<String, JsValue> {
        self.engine.tick_at(timestamp as i64);
        self.snapshot_json()
    }

    /// Flip a zone's valve; `false` for an unknown zone
    pub fn toggle_valve(&mut self, zone_id: &str) -> bool {
        let toggled = self.engine.toggle_valve(zone_id);
        if !toggled {
            console_warn(&format!("toggle_valve: unknown zone {}", zone_id));
        }
        toggled
    }

    /// Force the weather ("Sunny", "Cloudy" or "Rainy")
    pub fn set_weather(&mut self, condition: &str) -> Result<(), JsValue> {
        let condition: SkyCondition = condition
            .parse()
            .map_err(|e| js_error("Invalid weather", e))?;
        self.engine.set_weather(condition);
        Ok(())
    }

    /// Zones and weather as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot()).map_err(|e| js_error("Serialization failed", e))
    }

    /// Irrigation advice for one zone as JSON
    pub fn advice_json(&self, zone_id: &str) -> Result<String, JsValue> {
        let zone = self
            .engine
            .zone(zone_id)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown zone: {}", zone_id)))?;
        let advice = irrigation_advice(zone, self.engine.weather());
        serde_json::to_string(&advice).map_err(|e| js_error("Serialization failed", e))
    }

    pub fn zone_count(&self) -> usize {
        self.engine.zones().len()
    }
}

/// Classify a zone by its soil moisture (OPTIMAL, WARNING or CRITICAL)
#[wasm_bindgen]
pub fn classify_zone_status(moisture: f64) -> String {
    format!("{}", classify_moisture(moisture))
}

/// Generate a diurnal history ending at the current hour, as JSON
#[wasm_bindgen]
pub fn seed_history_json(hours_back: u32, points_per_hour: u32, rng_seed: Option<u32>) -> Result<String, JsValue> {
    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(u64::from(seed)),
        None => StdRng::from_entropy(),
    };
    let history = seed_history(hours_back, points_per_hour, &chrono::Local::now(), &mut rng);
    serde_json::to_string(&history).map_err(|e| js_error("Serialization failed", e))
}
