//! Where zone readings come from
//!
//! A refresh cycle either advances the in-process simulator or syncs the
//! engine with a remote irrigation backend. The engine lock is never held
//! across a network call.

use std::sync::Arc;

use chrono::{Local, Timelike};
use shared::{realtime_sample, now_millis, SensorReading, ZoneSimulationEngine};
use tokio::sync::Mutex;

use crate::config::{Config, SourceMode};
use crate::error::{AppError, AppResult};
use crate::external::{BackendClient, DevicePayload};

/// Engine shared between the scheduler task and request handlers
pub type SharedEngine = Arc<Mutex<ZoneSimulationEngine>>;

/// Reading source selected by configuration
#[derive(Debug, Clone)]
pub enum ReadingSource {
    /// Random-walk simulation, one engine tick per cycle
    Simulated,
    /// Remote backend polling
    Remote {
        client: BackendClient,
        /// Push a synthesized device sample per zone before polling
        feed_backend: bool,
    },
}

impl ReadingSource {
    /// Build the source described by the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        match config.source.mode {
            SourceMode::Simulated => Ok(ReadingSource::Simulated),
            SourceMode::Remote => {
                let client = BackendClient::with_base_url(
                    &config.source.base_url,
                    std::time::Duration::from_secs(config.source.timeout_secs),
                )?;
                Ok(ReadingSource::Remote {
                    client,
                    feed_backend: config.source.feed_backend,
                })
            }
        }
    }

    pub fn mode(&self) -> SourceMode {
        match self {
            ReadingSource::Simulated => SourceMode::Simulated,
            ReadingSource::Remote { .. } => SourceMode::Remote,
        }
    }

    /// Run one refresh cycle. Returns the number of zones that changed.
    ///
    /// Remote failures are logged and the affected zone is skipped; a cycle
    /// never fails as a whole.
    pub async fn refresh(&self, engine: &SharedEngine) -> usize {
        match self {
            ReadingSource::Simulated => {
                let mut engine = engine.lock().await;
                engine.tick();
                engine.zones().len()
            }
            ReadingSource::Remote {
                client,
                feed_backend,
            } => refresh_remote(client, *feed_backend, engine).await,
        }
    }

    /// Flip a zone's valve and return its new state.
    ///
    /// In remote mode the flip is applied locally first, then sent to the
    /// backend; a failed command restores the previous state.
    pub async fn toggle_valve(&self, engine: &SharedEngine, zone_id: &str) -> AppResult<bool> {
        let open = {
            let mut engine = engine.lock().await;
            if !engine.toggle_valve(zone_id) {
                return Err(AppError::zone_not_found(zone_id));
            }
            engine
                .zone(zone_id)
                .map(|z| z.is_valve_open)
                .ok_or_else(|| AppError::zone_not_found(zone_id))?
        };

        let ReadingSource::Remote { client, .. } = self else {
            return Ok(open);
        };

        match client.toggle_valve(zone_id, open).await {
            Ok(message) => {
                tracing::info!(zone_id, open, %message, "valve command acknowledged");
                Ok(open)
            }
            Err(err) => {
                tracing::warn!(zone_id, open, error = %err, "valve command failed, reverting");
                engine.lock().await.set_valve(zone_id, !open);
                Err(err)
            }
        }
    }
}

/// Per-zone result of one backend poll
struct ZoneUpdate {
    zone_id: String,
    history: Vec<SensorReading>,
    valve_open: bool,
}

async fn refresh_remote(client: &BackendClient, feed_backend: bool, engine: &SharedEngine) -> usize {
    let (zone_ids, payloads) = {
        let engine = engine.lock().await;
        let zone_ids: Vec<String> = engine.zones().iter().map(|z| z.id.clone()).collect();
        let payloads = if feed_backend {
            let hour = Local::now().hour();
            let timestamp = now_millis();
            let mut rng = rand::thread_rng();
            engine
                .zones()
                .iter()
                .map(|zone| {
                    let sample = realtime_sample(engine.weather(), hour, timestamp, &mut rng);
                    DevicePayload::new(&zone.id, &sample, zone.is_valve_open)
                })
                .collect()
        } else {
            Vec::new()
        };
        (zone_ids, payloads)
    };

    for payload in &payloads {
        match client.send_data(payload).await {
            Ok(decision) => tracing::debug!(
                zone_id = %payload.zone_id,
                pump = decision.pump,
                message = %decision.message,
                "device sample sent"
            ),
            Err(err) => tracing::warn!(zone_id = %payload.zone_id, error = %err, "failed to send device sample"),
        }
    }

    let mut updates = Vec::with_capacity(zone_ids.len());
    for zone_id in zone_ids {
        let valve_open = match client.fetch_valve_state(&zone_id).await {
            Ok(open) => open,
            Err(err) => {
                tracing::warn!(zone_id, error = %err, "failed to fetch valve state");
                continue;
            }
        };
        let history = match client.fetch_history(&zone_id).await {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(zone_id, error = %err, "failed to fetch history");
                continue;
            }
        };
        tracing::debug!(zone_id, records = history.len(), valve_open, "zone polled");
        updates.push(ZoneUpdate {
            zone_id,
            history,
            valve_open,
        });
    }

    let mut engine = engine.lock().await;
    let mut synced = 0;
    for update in updates {
        if engine.sync_zone(&update.zone_id, update.history, update.valve_open) {
            synced += 1;
        }
    }
    engine.notify();
    synced
}
