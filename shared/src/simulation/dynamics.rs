//! Per-tick evolution of a zone's sensor values

use rand::Rng;

use crate::models::{RainfallIntensity, SensorReading, SkyCondition, WeatherCondition};
use crate::validation::{clamp_percent, round_to};

/// Fraction of the gap to ambient temperature closed each tick
pub const THERMAL_RELAXATION: f64 = 0.05;

/// Moisture gained per tick while the valve is open (%)
pub const IRRIGATION_GAIN: f64 = 2.5;

/// Moisture gained per tick from rain (%)
pub const RAIN_GAIN: f64 = 0.5;

/// Base evaporative loss per tick (%)
pub const BASE_EVAPORATION: f64 = 0.1;

/// Temperature above which evaporation accelerates (°C)
pub const EVAPORATION_THRESHOLD_TEMP: f64 = 25.0;

/// Extra evaporative loss per degree above the threshold (%)
pub const EVAPORATION_PER_DEGREE: f64 = 0.05;

/// Maximum ambient temperature drift per tick, either direction (°C)
pub const AMBIENT_DRIFT: f64 = 0.25;

/// Symmetric random drift applied to the ambient temperature once per tick
pub fn drift_ambient<R: Rng>(weather: &mut WeatherCondition, rng: &mut R) {
    weather.ambient_temp += (rng.gen::<f64>() - 0.5) * 2.0 * AMBIENT_DRIFT;
}

/// Relax a temperature toward ambient (first-order approach)
pub fn relax_temperature(temperature: f64, ambient_temp: f64) -> f64 {
    temperature + (ambient_temp - temperature) * THERMAL_RELAXATION
}

/// Moisture after one tick, clamped to [0, 100].
///
/// An open valve dominates rain, which dominates evaporation.
pub fn next_moisture(moisture: f64, temperature: f64, valve_open: bool, sky: SkyCondition) -> f64 {
    let next = if valve_open {
        moisture + IRRIGATION_GAIN
    } else if sky.is_rainy() {
        moisture + RAIN_GAIN
    } else {
        let excess_heat = (temperature - EVAPORATION_THRESHOLD_TEMP).max(0.0);
        moisture - (BASE_EVAPORATION + excess_heat * EVAPORATION_PER_DEGREE)
    };
    clamp_percent(next)
}

/// Air humidity coupled to soil moisture plus a weather offset and jitter
pub fn coupled_humidity<R: Rng>(moisture: f64, sky: SkyCondition, rng: &mut R) -> f64 {
    let offset = if sky.is_rainy() { 30.0 } else { 10.0 };
    clamp_percent(moisture * 0.6 + offset + rng.gen::<f64>() * 5.0)
}

/// Draw an intensity for a raining period: 30% light, then 70% moderate
pub fn draw_intensity<R: Rng>(rng: &mut R) -> RainfallIntensity {
    if rng.gen::<f64>() < 0.3 {
        RainfallIntensity::Light
    } else if rng.gen::<f64>() < 0.7 {
        RainfallIntensity::Moderate
    } else {
        RainfallIntensity::Heavy
    }
}

/// Symmetric jitter of total width `span` around zero
pub(crate) fn jitter<R: Rng>(rng: &mut R, span: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * span
}

/// Compute a zone's next reading from its previous one.
///
/// `weather` is the already-drifted weather of the current tick.
pub fn next_reading<R: Rng>(
    previous: &SensorReading,
    valve_open: bool,
    weather: &WeatherCondition,
    timestamp: i64,
    rng: &mut R,
) -> SensorReading {
    let sky = weather.condition;

    let temperature = relax_temperature(previous.temperature, weather.ambient_temp);
    let moisture = next_moisture(previous.moisture, temperature, valve_open, sky);
    let humidity = coupled_humidity(moisture, sky, rng);

    // Deeper layers are steadier
    let soil_moisture_10cm = clamp_percent(moisture + jitter(rng, 5.0));
    let soil_moisture_30cm = clamp_percent(moisture + jitter(rng, 3.0));
    let soil_moisture_60cm = clamp_percent(moisture + jitter(rng, 2.0));

    let light = (sky.base_light() + jitter(rng, 200.0)).max(0.0).round();
    let wind_speed = round_to(5.0 + rng.gen::<f64>() * 15.0, 1);

    let rainfall = sky.is_rainy();
    let rainfall_intensity = if rainfall {
        draw_intensity(rng)
    } else {
        RainfallIntensity::None
    };

    SensorReading {
        timestamp,
        moisture,
        temperature,
        humidity,
        soil_moisture_10cm,
        soil_moisture_30cm,
        soil_moisture_60cm,
        light,
        wind_speed,
        rainfall,
        rainfall_intensity,
    }
}
