//! Periodic refresh driver
//!
//! Owns the interval timer that the engine itself does not have. One
//! refresh cycle runs per interval, the first one a full interval after
//! `start()`.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::source::{ReadingSource, SharedEngine};

/// Starts and stops the background refresh task
pub struct SimulationScheduler {
    interval: Duration,
    engine: SharedEngine,
    source: Arc<ReadingSource>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationScheduler {
    pub fn new(engine: SharedEngine, source: Arc<ReadingSource>, interval: Duration) -> Self {
        Self {
            interval,
            engine,
            source,
            task: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the refresh task. Returns `false` if it was already running.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::warn!("scheduler already running, start ignored");
            return false;
        }

        let interval = self.interval;
        let engine = self.engine.clone();
        let source = self.source.clone();

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let updated = source.refresh(&engine).await;
                tracing::trace!(updated, "refresh cycle done");
            }
        }));

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            mode = %self.source.mode(),
            "scheduler started"
        );
        true
    }

    /// Cancel the refresh task. Returns `false` if nothing was running.
    pub fn stop(&self) -> bool {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                tracing::info!("scheduler stopped");
                true
            }
            None => {
                tracing::debug!("scheduler not running, stop ignored");
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for SimulationScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for SimulationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationScheduler")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}
