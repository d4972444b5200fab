//! Simulation service
//!
//! Glue between the engine, the reading source, the scheduler and the HTTP
//! layer. Reads are served from the snapshot published by an engine
//! listener, so they never wait on a running refresh cycle.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shared::{
    irrigation_advice, EngineOptions, EngineSnapshot, IrrigationAdvice, SensorReading,
    SkyCondition, Subscription, WeatherCondition, Zone, ZoneSimulationEngine,
};
use tokio::sync::{watch, Mutex};

use super::scheduler::SimulationScheduler;
use super::source::{ReadingSource, SharedEngine};
use crate::config::{Config, SourceMode};
use crate::error::{AppError, AppResult};

/// Scheduler and engine status
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationStatus {
    pub running: bool,
    pub mode: SourceMode,
    pub tick_interval_ms: u64,
    pub history_limit: usize,
    pub listeners: usize,
}

/// Full dashboard payload
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub zones: Vec<Zone>,
    pub weather: WeatherCondition,
    pub running: bool,
}

pub struct SimulationService {
    engine: SharedEngine,
    source: Arc<ReadingSource>,
    scheduler: SimulationScheduler,
    snapshot: watch::Receiver<EngineSnapshot>,
    _publisher: Subscription,
}

impl SimulationService {
    /// Wrap an engine, publishing every notification into a watch channel
    pub fn new(engine: ZoneSimulationEngine, source: ReadingSource, tick_interval: Duration) -> Self {
        let (tx, rx) = watch::channel(engine.snapshot());
        let publisher = engine.subscribe(move |zones, weather| {
            tx.send_replace(EngineSnapshot::new(zones, weather));
        });

        let engine = Arc::new(Mutex::new(engine));
        let source = Arc::new(source);
        let scheduler = SimulationScheduler::new(engine.clone(), source.clone(), tick_interval);

        Self {
            engine,
            source,
            scheduler,
            snapshot: rx,
            _publisher: publisher,
        }
    }

    /// Build the engine and source described by the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let seeds = config.zone_seeds();
        shared::validate_zone_seeds(&seeds)?;
        shared::validate_history_limit(config.simulation.history_limit)?;

        let options = EngineOptions {
            history_limit: config.simulation.history_limit,
            // A remote backend supplies its own history
            seed_history: config.simulation.seed_history
                && config.source.mode == SourceMode::Simulated,
            rng_seed: config.simulation.rng_seed,
            weather: WeatherCondition::default(),
        };
        let engine = ZoneSimulationEngine::new(&seeds, options);
        let source = ReadingSource::from_config(config)?;

        Ok(Self::new(
            engine,
            source,
            Duration::from_millis(config.simulation.tick_interval_ms),
        ))
    }

    /// Latest published state
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver that observes every published state
    pub fn updates(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot.clone()
    }

    pub fn dashboard(&self) -> Dashboard {
        let snapshot = self.snapshot();
        Dashboard {
            zones: snapshot.zones,
            weather: snapshot.weather,
            running: self.scheduler.is_running(),
        }
    }

    pub fn zone(&self, zone_id: &str) -> AppResult<Zone> {
        self.snapshot
            .borrow()
            .zone(zone_id)
            .cloned()
            .ok_or_else(|| AppError::zone_not_found(zone_id))
    }

    pub fn history(&self, zone_id: &str) -> AppResult<Vec<SensorReading>> {
        self.zone(zone_id).map(|zone| zone.sensor_history)
    }

    pub fn advice(&self, zone_id: &str) -> AppResult<IrrigationAdvice> {
        let snapshot = self.snapshot.borrow();
        let zone = snapshot
            .zone(zone_id)
            .ok_or_else(|| AppError::zone_not_found(zone_id))?;
        Ok(irrigation_advice(zone, &snapshot.weather))
    }

    pub fn weather(&self) -> WeatherCondition {
        self.snapshot.borrow().weather.clone()
    }

    /// Flip a zone's valve and return the updated zone
    pub async fn toggle_valve(&self, zone_id: &str) -> AppResult<Zone> {
        self.source.toggle_valve(&self.engine, zone_id).await?;
        self.zone(zone_id)
    }

    /// Override the shared weather condition
    pub async fn set_weather(&self, condition: SkyCondition) -> WeatherCondition {
        let mut engine = self.engine.lock().await;
        engine.set_weather(condition);
        engine.weather().clone()
    }

    /// Run one refresh cycle right away, independent of the scheduler
    pub async fn refresh_now(&self) -> usize {
        self.source.refresh(&self.engine).await
    }

    pub fn start(&self) -> bool {
        self.scheduler.start()
    }

    pub fn stop(&self) -> bool {
        self.scheduler.stop()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn mode(&self) -> SourceMode {
        self.source.mode()
    }

    pub async fn status(&self) -> SimulationStatus {
        let engine = self.engine.lock().await;
        SimulationStatus {
            running: self.scheduler.is_running(),
            mode: self.source.mode(),
            tick_interval_ms: self.scheduler.interval().as_millis() as u64,
            history_limit: engine.history_limit(),
            listeners: engine.listener_count(),
        }
    }
}

impl std::fmt::Debug for SimulationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationService")
            .field("mode", &self.source.mode())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::default_zone_seeds;

    fn service() -> SimulationService {
        let options = EngineOptions {
            seed_history: false,
            rng_seed: Some(17),
            ..EngineOptions::default()
        };
        SimulationService::new(
            ZoneSimulationEngine::new(&default_zone_seeds(), options),
            ReadingSource::Simulated,
            Duration::from_millis(3000),
        )
    }

    #[tokio::test]
    async fn test_snapshot_follows_mutations() {
        let service = service();
        assert!(service.history("field1").unwrap().is_empty());

        service.refresh_now().await;
        assert_eq!(service.history("field1").unwrap().len(), 1);

        let zone = service.toggle_valve("field1").await.unwrap();
        assert!(zone.is_valve_open);
        assert!(service.dashboard().zones[0].is_valve_open);
    }

    #[tokio::test]
    async fn test_set_weather_published() {
        let service = service();
        let weather = service.set_weather(SkyCondition::Rainy).await;
        assert_eq!(weather.ambient_temp, 20.0);
        assert_eq!(service.weather().condition, SkyCondition::Rainy);
    }

    #[tokio::test]
    async fn test_unknown_zone() {
        let service = service();
        assert!(matches!(service.zone("nope"), Err(AppError::NotFound(_))));
        assert!(matches!(service.advice("nope"), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_status() {
        let service = service();
        let status = service.status().await;
        assert!(!status.running);
        assert_eq!(status.mode, SourceMode::Simulated);
        assert_eq!(status.tick_interval_ms, 3000);
        assert_eq!(status.listeners, 1);
    }
}
