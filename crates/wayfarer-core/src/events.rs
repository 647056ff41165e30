//! Typed change notifications for the storage layer.
//!
//! Subscribers are registered callbacks, so the set of listeners is explicit
//! and visible at construction time. Emission is best-effort: a listener
//! cannot fail a mutation that has already persisted.

use std::sync::Mutex;

use crate::models::{FavoriteEntry, HistoryEntry, Itinerary, Preferences};

#[derive(Clone, Debug, PartialEq)]
pub enum StorageEvent {
    FavoriteAdded(FavoriteEntry),
    FavoriteRemoved(FavoriteEntry),
    FavoriteUpdated(FavoriteEntry),
    FavoritesCleared,
    SearchRecorded(HistoryEntry),
    SearchHistoryCleared,
    PreferencesUpdated(Preferences),
    PreferencesReset,
    ItinerarySaved(Itinerary),
    DataImported,
    AllDataCleared,
}

pub type Subscriber = Box<dyn Fn(&StorageEvent) + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&StorageEvent) + Send + Sync + 'static) {
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(Box::new(subscriber)),
            Err(_) => tracing::warn!("event bus mutex poisoned; dropping new subscriber"),
        }
    }

    pub fn emit(&self, event: &StorageEvent) {
        match self.subscribers.lock() {
            Ok(subscribers) => {
                for subscriber in subscribers.iter() {
                    subscriber(event);
                }
            }
            Err(_) => tracing::warn!("event bus mutex poisoned; dropping notification"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}
