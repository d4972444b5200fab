//! Scheduler tests
//!
//! Start/stop lifecycle of the periodic refresh task, run on a paused
//! tokio clock so intervals elapse instantly and deterministically.

use std::time::Duration;

use shared::{default_zone_seeds, EngineOptions, ZoneSimulationEngine};
use smartirrig_server::services::{ReadingSource, SimulationService};

const INTERVAL: Duration = Duration::from_millis(3000);

fn service() -> SimulationService {
    let engine = ZoneSimulationEngine::new(
        &default_zone_seeds(),
        EngineOptions {
            seed_history: false,
            rng_seed: Some(99),
            ..EngineOptions::default()
        },
    );
    SimulationService::new(engine, ReadingSource::Simulated, INTERVAL)
}

fn history_len(service: &SimulationService) -> usize {
    service.history("field1").unwrap().len()
}

#[tokio::test(start_paused = true)]
async fn test_first_refresh_after_one_interval() {
    let service = service();
    assert!(service.start());
    assert!(service.is_running());

    tokio::time::sleep(INTERVAL - Duration::from_millis(1)).await;
    assert_eq!(history_len(&service), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(history_len(&service), 1);

    tokio::time::sleep(INTERVAL * 3).await;
    assert_eq!(history_len(&service), 4);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_is_noop() {
    let service = service();
    assert!(service.start());
    assert!(!service.start());

    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    // A second task would have doubled the ticks
    assert_eq!(history_len(&service), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_refresh() {
    let service = service();
    service.start();
    tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;
    assert_eq!(history_len(&service), 2);

    assert!(service.stop());
    assert!(!service.is_running());
    assert!(!service.stop());

    tokio::time::sleep(INTERVAL * 5).await;
    assert_eq!(history_len(&service), 2);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop() {
    let service = service();
    service.start();
    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    service.stop();

    assert!(service.start());
    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    assert_eq!(history_len(&service), 2);
}

#[tokio::test(start_paused = true)]
async fn test_updates_channel_sees_ticks() {
    let service = service();
    let mut updates = service.updates();
    updates.borrow_and_update();

    service.start();
    tokio::time::timeout(INTERVAL * 2, updates.changed())
        .await
        .expect("no update within two intervals")
        .unwrap();
    assert_eq!(updates.borrow().zones[0].sensor_history.len(), 1);
}
