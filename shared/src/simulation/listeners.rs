//! Observer registry notified after every engine mutation

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::models::{WeatherCondition, Zone};

/// Callback receiving the full zone list and the shared weather
pub type Listener = Arc<dyn Fn(&[Zone], &WeatherCondition) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panicking listener never runs while the lock is held
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Set of active listeners.
///
/// Cloning shares the same set. Listeners are invoked outside the internal
/// lock, so a callback may unsubscribe itself or others.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener and return the handle that removes it
    pub fn register(&self, listener: Listener) -> Subscription {
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every active listener with the given state
    pub fn notify(&self, zones: &[Zone], weather: &WeatherCondition) {
        let listeners: Vec<Listener> = lock(&self.inner)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(zones, weather);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping it leaves the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener. Returns `true` only on the call that removed it.
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = lock(&inner);
        let before = registry.listeners.len();
        registry.listeners.retain(|(id, _)| *id != self.id);
        registry.listeners.len() != before
    }
}
