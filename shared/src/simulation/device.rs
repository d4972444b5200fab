//! Synthetic field-device samples pushed to a live backend
//!
//! When the dashboard is wired to a remote backend with no hardware
//! attached, something still has to feed it. These samples play that role:
//! a coarse weather- and time-of-day-driven reading, independent of the
//! engine's own tick dynamics.

use rand::Rng;

use super::dynamics::jitter;
use crate::models::{RainfallIntensity, SensorReading, SkyCondition, WeatherCondition};
use crate::validation::clamp_percent;

/// Whether an hour of day counts as night for the device model
pub fn is_night(hour: u32) -> bool {
    hour < 6 || hour > 22
}

/// Build one device sample for the given weather and local hour
pub fn realtime_sample<R: Rng>(
    weather: &WeatherCondition,
    hour: u32,
    timestamp: i64,
    rng: &mut R,
) -> SensorReading {
    let mut base_temp = 25.0;
    let mut base_humidity = 60.0;
    let mut base_moisture = 45.0;
    let mut light = 450.0;

    match weather.condition {
        SkyCondition::Rainy => {
            base_humidity += 20.0;
            base_moisture += 15.0;
        }
        SkyCondition::Cloudy => light -= 200.0,
        SkyCondition::Sunny => {
            base_temp += 5.0;
            light += 200.0;
        }
    }

    if is_night(hour) {
        light = 50.0;
        base_temp -= 8.0;
    }

    let temperature = base_temp + jitter(rng, 10.0);
    let humidity = clamp_percent(base_humidity + jitter(rng, 20.0));
    let moisture = clamp_percent(base_moisture + jitter(rng, 15.0));
    let wind_speed = 5.0 + rng.gen::<f64>() * 15.0;
    let rainfall = weather.condition.is_rainy() && rng.gen::<f64>() < 0.3;

    let rainfall_intensity = match (rainfall, rng.gen::<f64>() < 0.5) {
        (false, _) => RainfallIntensity::None,
        (true, true) => RainfallIntensity::Light,
        (true, false) => RainfallIntensity::Moderate,
    };

    SensorReading {
        timestamp,
        moisture,
        temperature,
        humidity,
        soil_moisture_10cm: clamp_percent(moisture * 0.9 + jitter(rng, 5.0)),
        soil_moisture_30cm: clamp_percent(moisture + jitter(rng, 5.0)),
        soil_moisture_60cm: clamp_percent(moisture * 1.1 + jitter(rng, 5.0)),
        light: (light + jitter(rng, 100.0)).max(0.0),
        wind_speed,
        rainfall,
        rainfall_intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_night_hours() {
        assert!(is_night(0));
        assert!(is_night(5));
        assert!(!is_night(6));
        assert!(!is_night(22));
        assert!(is_night(23));
    }

    #[test]
    fn test_rain_only_when_rainy() {
        let mut rng = StdRng::seed_from_u64(8);
        let sunny = WeatherCondition::new(SkyCondition::Sunny, 30.0);
        for _ in 0..100 {
            let sample = realtime_sample(&sunny, 13, 0, &mut rng);
            assert!(!sample.rainfall);
            assert_eq!(sample.rainfall_intensity, RainfallIntensity::None);
        }

        let rainy = WeatherCondition::new(SkyCondition::Rainy, 20.0);
        let raining = (0..200)
            .map(|_| realtime_sample(&rainy, 13, 0, &mut rng))
            .filter(|s| s.rainfall)
            .count();
        assert!(raining > 0 && raining < 200);
    }

    #[test]
    fn test_night_is_dark() {
        let mut rng = StdRng::seed_from_u64(2);
        let weather = WeatherCondition::new(SkyCondition::Sunny, 30.0);
        for _ in 0..50 {
            let sample = realtime_sample(&weather, 2, 0, &mut rng);
            assert!(sample.light <= 100.0);
            assert!((0.0..=100.0).contains(&sample.soil_moisture_60cm));
        }
    }
}
