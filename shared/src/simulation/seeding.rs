//! Diurnal history used to bootstrap a zone's charts at startup

use std::f64::consts::PI;

use chrono::{DateTime, Duration, TimeZone, Timelike};
use rand::Rng;

use super::dynamics::{draw_intensity, jitter};
use crate::models::{RainfallIntensity, SensorReading};
use crate::validation::{clamp_percent, round_to};

/// Generate `hours_back * points_per_hour` readings ending at the top of
/// the hour containing `now`, oldest first.
///
/// Values follow a day/night model keyed on the local hour of each point:
/// warm afternoons, humid nights, daylight between roughly 6h and 19h and
/// more frequent rain in the evening and at night.
pub fn seed_history<Tz, R>(
    hours_back: u32,
    points_per_hour: u32,
    now: &DateTime<Tz>,
    rng: &mut R,
) -> Vec<SensorReading>
where
    Tz: TimeZone,
    R: Rng,
{
    let points_per_hour = points_per_hour.clamp(1, 60);
    let step_minutes = i64::from(60 / points_per_hour);
    let total = i64::from(hours_back) * i64::from(points_per_hour);

    let top_of_hour = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| now.clone());

    (0..total)
        .map(|index| {
            let at = top_of_hour.clone() - Duration::minutes(step_minutes * (total - 1 - index));
            diurnal_reading(at.timestamp_millis(), at.hour(), rng)
        })
        .collect()
}

/// One reading of the day/night model for a given hour of day
pub fn diurnal_reading<R: Rng>(timestamp: i64, hour: u32, rng: &mut R) -> SensorReading {
    let h = f64::from(hour);

    let base_temp = if (6..=18).contains(&hour) {
        18.0 + 8.0 * (PI * (h - 6.0) / 12.0).sin()
    } else {
        15.0 + rng.gen::<f64>() * 3.0
    };
    let temperature = base_temp + jitter(rng, 2.0);

    let base_humidity = if hour >= 20 || hour <= 8 {
        75.0
    } else if (12..=16).contains(&hour) {
        45.0
    } else {
        60.0
    };
    let humidity = (base_humidity + jitter(rng, 15.0)).clamp(30.0, 95.0);

    // Soil dries during the hot hours
    let base_moisture = if (10..=16).contains(&hour) { 45.0 } else { 50.0 };
    let moisture = (base_moisture + jitter(rng, 10.0)).clamp(20.0, 80.0);

    let light = if (6..=19).contains(&hour) {
        let sun = (PI * (h - 6.0) / 13.0).sin();
        (100.0 + 700.0 * sun + jitter(rng, 100.0)).max(0.0)
    } else {
        rng.gen::<f64>() * 10.0
    };

    let midday_gusts = if (10..=16).contains(&hour) { 5.0 } else { 0.0 };
    let wind_speed = 3.0 + rng.gen::<f64>() * 15.0 + midday_gusts;

    let rain_probability = if hour >= 18 || hour <= 6 { 0.15 } else { 0.05 };
    let rainfall = rng.gen::<f64>() < rain_probability;

    let soil_moisture_10cm = clamp_percent(moisture + jitter(rng, 8.0));
    let soil_moisture_30cm = clamp_percent(moisture + jitter(rng, 5.0));
    let soil_moisture_60cm = clamp_percent(moisture + jitter(rng, 3.0));

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
        light: light.round(),
        wind_speed: round_to(wind_speed, 1),
        rainfall,
        rainfall_intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, minute, 42).unwrap()
    }

    #[test]
    fn test_hourly_points_end_at_top_of_hour() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = at(14, 37);
        let history = seed_history(24, 1, &now, &mut rng);

        assert_eq!(history.len(), 24);
        assert_eq!(history.last().unwrap().timestamp, at(14, 0).timestamp_millis() - 42_000);
        for pair in history.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 3_600_000);
        }
    }

    #[test]
    fn test_sub_hourly_spacing() {
        let mut rng = StdRng::seed_from_u64(5);
        let history = seed_history(2, 4, &at(9, 5), &mut rng);

        assert_eq!(history.len(), 8);
        for pair in history.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 15 * 60 * 1000);
        }
    }

    #[test]
    fn test_local_hour_drives_daylight() {
        let mut rng = StdRng::seed_from_u64(9);
        // Midnight UTC is 02:00 at +02:00
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 10, 0).unwrap().with_timezone(&offset);
        let history = seed_history(1, 1, &now, &mut rng);

        assert_eq!(history.len(), 1);
        assert!(history[0].light <= 10.0);
    }

    #[test]
    fn test_diurnal_ranges() {
        let mut rng = StdRng::seed_from_u64(21);
        for hour in 0..24 {
            for _ in 0..20 {
                let reading = diurnal_reading(0, hour, &mut rng);
                assert!((30.0..=95.0).contains(&reading.humidity));
                assert!((20.0..=80.0).contains(&reading.moisture));
                assert!((0.0..=100.0).contains(&reading.soil_moisture_10cm));
                assert!(reading.light >= 0.0);
                assert!(reading.wind_speed >= 3.0);
                assert_eq!(
                    reading.rainfall_intensity == RainfallIntensity::None,
                    !reading.rainfall
                );
                if !(6..=19).contains(&hour) {
                    assert!(reading.light <= 10.0);
                }
            }
        }
    }

    #[test]
    fn test_midday_is_warmer_than_night() {
        let mut rng = StdRng::seed_from_u64(4);
        let noon: f64 = (0..50).map(|_| diurnal_reading(0, 12, &mut rng).temperature).sum::<f64>() / 50.0;
        let night: f64 = (0..50).map(|_| diurnal_reading(0, 2, &mut rng).temperature).sum::<f64>() / 50.0;
        assert!(noon > night + 5.0);
    }
}
