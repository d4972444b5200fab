//! Zone simulation engine
//!
//! Owns the zones and the shared weather, advances them one tick at a time
//! and notifies subscribers after every mutation. The engine has no timer
//! of its own: whoever owns it decides when to call [`ZoneSimulationEngine::tick`].

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::dynamics::{drift_ambient, next_reading};
use super::listeners::{Listener, ListenerRegistry, Subscription};
use super::seeding::seed_history;
use crate::models::{default_zone_seeds, SensorReading, SkyCondition, WeatherCondition, Zone, ZoneSeed};
use crate::types::{now_millis, EngineSnapshot, DEFAULT_HISTORY_LIMIT};

/// Construction options for [`ZoneSimulationEngine`]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Maximum number of readings kept per zone
    pub history_limit: usize,
    /// Pre-populate each zone with a day of diurnal history
    pub seed_history: bool,
    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
    pub weather: WeatherCondition,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            seed_history: true,
            rng_seed: None,
            weather: WeatherCondition::default(),
        }
    }
}

/// In-memory irrigation simulator
pub struct ZoneSimulationEngine {
    zones: Vec<Zone>,
    weather: WeatherCondition,
    listeners: ListenerRegistry,
    history_limit: usize,
    rng: StdRng,
}

impl ZoneSimulationEngine {
    /// Build an engine from a seed list
    pub fn new(seeds: &[ZoneSeed], options: EngineOptions) -> Self {
        let mut rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let history_limit = options.history_limit.max(1);
        let now = now_millis();

        let zones = seeds
            .iter()
            .map(|seed| {
                let mut zone = Zone::from_seed(seed, now);
                if options.seed_history {
                    let history = seed_history(history_limit as u32, 1, &Local::now(), &mut rng);
                    zone.replace_history(history, history_limit);
                }
                zone
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            zones = zones.len(),
            history_limit,
            seeded = options.seed_history,
            "simulation engine created"
        );

        Self {
            zones,
            weather: options.weather,
            listeners: ListenerRegistry::new(),
            history_limit,
            rng,
        }
    }

    /// Engine with the built-in zones and default options
    pub fn with_default_zones() -> Self {
        Self::new(&default_zone_seeds(), EngineOptions::default())
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    pub fn weather(&self) -> &WeatherCondition {
        &self.weather
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Copy of the full state
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(&self.zones, &self.weather)
    }

    /// Register a listener.
    ///
    /// The listener is called once right away with the current state, then
    /// after every mutation until unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Zone], &WeatherCondition) + Send + Sync + 'static,
    {
        let listener: Listener = std::sync::Arc::new(listener);
        let subscription = self.listeners.register(listener.clone());
        listener(&self.zones, &self.weather);
        subscription
    }

    /// Push the current state to every listener
    pub fn notify(&self) {
        self.listeners.notify(&self.zones, &self.weather);
    }

    /// Flip a zone's valve. Unknown ids leave the state untouched.
    ///
    /// Returns `false` when no zone matched.
    pub fn toggle_valve(&mut self, zone_id: &str) -> bool {
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == zone_id) else {
            tracing::warn!(zone_id, "toggle_valve: unknown zone");
            return false;
        };
        zone.is_valve_open = !zone.is_valve_open;
        tracing::info!(zone_id, open = zone.is_valve_open, "valve toggled");
        self.notify();
        true
    }

    /// Force a valve to a given state, notifying only if it changed
    pub fn set_valve(&mut self, zone_id: &str, open: bool) -> bool {
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == zone_id) else {
            tracing::warn!(zone_id, "set_valve: unknown zone");
            return false;
        };
        if zone.is_valve_open != open {
            zone.is_valve_open = open;
            self.notify();
        }
        true
    }

    /// Override the weather condition and its ambient temperature
    pub fn set_weather(&mut self, condition: SkyCondition) {
        self.weather.force(condition);
        tracing::info!(
            %condition,
            ambient_temp = self.weather.ambient_temp,
            "weather overridden"
        );
        self.notify();
    }

    /// Advance every zone by one step at the current wall-clock time
    pub fn tick(&mut self) {
        self.tick_at(now_millis());
    }

    /// Advance every zone by one step, stamping readings with `timestamp`.
    ///
    /// Subscribers are notified once, after all zones have been updated.
    pub fn tick_at(&mut self, timestamp: i64) {
        drift_ambient(&mut self.weather, &mut self.rng);

        for zone in &mut self.zones {
            let previous_status = zone.status;
            let reading = next_reading(
                &zone.current_reading,
                zone.is_valve_open,
                &self.weather,
                timestamp,
                &mut self.rng,
            );
            zone.record(reading, self.history_limit);

            if zone.status != previous_status {
                tracing::info!(
                    zone_id = %zone.id,
                    from = %previous_status,
                    to = %zone.status,
                    moisture = zone.current_reading.moisture,
                    "zone status changed"
                );
            }
        }

        self.notify();
    }

    /// Replace a zone's state with records fetched from a live backend.
    ///
    /// `history_newest_first` is in the backend's reverse-chronological
    /// order. The shared weather is derived from the newest record. An
    /// empty history leaves everything untouched. Does not notify; callers
    /// syncing several zones notify once at the end.
    pub fn sync_zone(
        &mut self,
        zone_id: &str,
        mut history_newest_first: Vec<SensorReading>,
        valve_open: bool,
    ) -> bool {
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == zone_id) else {
            tracing::warn!(zone_id, "sync_zone: unknown zone");
            return false;
        };

        history_newest_first.truncate(self.history_limit);
        history_newest_first.reverse();
        let history: Vec<SensorReading> = history_newest_first
            .into_iter()
            .map(SensorReading::normalized)
            .collect();

        if !zone.replace_history(history, self.history_limit) {
            tracing::debug!(zone_id, "sync_zone: backend returned no history");
            return false;
        }
        zone.is_valve_open = valve_open;
        self.weather.observe(&zone.current_reading);
        true
    }
}

impl std::fmt::Debug for ZoneSimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneSimulationEngine")
            .field("zones", &self.zones.len())
            .field("weather", &self.weather)
            .field("listeners", &self.listeners)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}
