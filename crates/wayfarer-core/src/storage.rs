//! Durable CRUD over the planner's persisted documents, with change
//! notification.
//!
//! The manager is constructed explicitly and injected wherever persistence is
//! needed; there is no process-wide instance. Failure policy: a document that
//! fails to deserialize is treated as absent, and backend errors are logged
//! and reported as a `false` or empty return. Nothing in this module panics
//! or propagates a storage error to callers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::events::{EventBus, StorageEvent};
use crate::models::{
    Destination, DestinationId, FavoriteEntry, FavoriteUpdate, HistoryEntry, Itinerary,
    Preferences,
};
use crate::persistence::{DocumentKey, DocumentStore};
use crate::validate;

/// Most entries the search history retains.
pub const MAX_HISTORY: usize = 10;

/// Snapshot of the exportable documents plus the moment it was taken.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub favorites: Vec<FavoriteEntry>,
    pub search_history: Vec<HistoryEntry>,
    pub preferences: Preferences,
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
}

/// Payload accepted by [`StorageManager::import_data`]. Each present field
/// replaces its document wholesale; absent fields leave the stored document
/// untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<FavoriteEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_history: Option<Vec<HistoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl From<ExportBundle> for ImportData {
    fn from(bundle: ExportBundle) -> Self {
        Self {
            favorites: Some(bundle.favorites),
            search_history: Some(bundle.search_history),
            preferences: Some(bundle.preferences),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageStats {
    pub favorites: usize,
    pub search_history: usize,
    pub preference_keys: usize,
    pub estimated_size_bytes: usize,
}

pub struct StorageManager {
    store: Arc<dyn DocumentStore>,
    events: EventBus,
}

impl StorageManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            events: EventBus::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ---- favorites ----

    /// Current favorites in insertion order. Unset or corrupt documents read
    /// as empty.
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.read_list(DocumentKey::Favorites)
    }

    /// Persists `destination` as a new favorite. Rejects records failing
    /// semantic validation and ids that are already favorited.
    pub fn add_favorite(&self, destination: Destination) -> bool {
        if let Err(reason) = validate::validate_destination(&destination) {
            tracing::warn!(id = %destination.id, %reason, "rejecting favorite");
            return false;
        }

        let mut favorites = self.favorites();
        if favorites
            .iter()
            .any(|entry| entry.destination.id == destination.id)
        {
            tracing::warn!(id = %destination.id, "destination already in favorites");
            return false;
        }

        let entry = FavoriteEntry {
            destination,
            added_at: OffsetDateTime::now_utc(),
            updated_at: None,
            notes: None,
            visited: None,
        };
        favorites.push(entry.clone());

        if !self.write_list(DocumentKey::Favorites, &favorites) {
            return false;
        }
        self.events.emit(&StorageEvent::FavoriteAdded(entry));
        true
    }

    /// Returns whether an entry with `id` existed and was removed.
    pub fn remove_favorite(&self, id: &DestinationId) -> bool {
        let mut favorites = self.favorites();
        let Some(index) = favorites
            .iter()
            .position(|entry| &entry.destination.id == id)
        else {
            return false;
        };

        let removed = favorites.remove(index);
        if !self.write_list(DocumentKey::Favorites, &favorites) {
            return false;
        }
        self.events.emit(&StorageEvent::FavoriteRemoved(removed));
        true
    }

    pub fn is_favorited(&self, id: &DestinationId) -> bool {
        self.favorites()
            .iter()
            .any(|entry| &entry.destination.id == id)
    }

    /// Merges `update` into the favorite with `id`, stamping an
    /// updated-timestamp. Returns false when the id is not favorited.
    pub fn update_favorite(&self, id: &DestinationId, update: FavoriteUpdate) -> bool {
        let mut favorites = self.favorites();
        let Some(entry) = favorites
            .iter_mut()
            .find(|entry| &entry.destination.id == id)
        else {
            return false;
        };

        if let Some(notes) = update.notes {
            entry.notes = Some(notes);
        }
        if let Some(visited) = update.visited {
            entry.visited = Some(visited);
        }
        entry.updated_at = Some(OffsetDateTime::now_utc());
        let updated = entry.clone();

        if !self.write_list(DocumentKey::Favorites, &favorites) {
            return false;
        }
        self.events.emit(&StorageEvent::FavoriteUpdated(updated));
        true
    }

    pub fn clear_favorites(&self) -> bool {
        if !self.remove_quietly(DocumentKey::Favorites) {
            return false;
        }
        self.events.emit(&StorageEvent::FavoritesCleared);
        true
    }

    // ---- search history ----

    /// Most-recent-first, truncated to `limit`.
    pub fn search_history(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut history: Vec<HistoryEntry> = self.read_list(DocumentKey::SearchHistory);
        history.truncate(limit);
        history
    }

    /// Records a search at the front of the history. A query already present
    /// (by exact trimmed text) moves to the front instead of duplicating;
    /// blank input is a no-op.
    pub fn add_search_query(&self, query: &str) -> bool {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return false;
        }

        // Reading one short of the cap leaves room for the new entry.
        let history = self.search_history(MAX_HISTORY - 1);
        let mut retained: Vec<HistoryEntry> = history
            .into_iter()
            .filter(|entry| entry.query != trimmed)
            .collect();

        let entry = HistoryEntry {
            query: trimmed.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            result_count: 0,
        };
        retained.insert(0, entry.clone());

        if !self.write_list(DocumentKey::SearchHistory, &retained) {
            return false;
        }
        self.events.emit(&StorageEvent::SearchRecorded(entry));
        true
    }

    /// Updates the result count and timestamp of the most recent entry for
    /// `query`. Returns false when no entry matches.
    pub fn update_search_result_count(&self, query: &str, result_count: u64) -> bool {
        let mut history = self.search_history(MAX_HISTORY);
        let Some(entry) = history.iter_mut().find(|entry| entry.query == query) else {
            return false;
        };

        entry.result_count = result_count;
        entry.timestamp = OffsetDateTime::now_utc();
        self.write_list(DocumentKey::SearchHistory, &history)
    }

    pub fn clear_search_history(&self) -> bool {
        if !self.remove_quietly(DocumentKey::SearchHistory) {
            return false;
        }
        self.events.emit(&StorageEvent::SearchHistoryCleared);
        true
    }

    pub fn last_search_query(&self) -> Option<String> {
        self.search_history(1).into_iter().next().map(|e| e.query)
    }

    // ---- preferences ----

    /// The stored preferences with defaults filled in for anything missing.
    pub fn user_preferences(&self) -> Preferences {
        match self.read_raw(DocumentKey::Preferences) {
            Some(body) => match serde_json::from_str(&body) {
                Ok(preferences) => preferences,
                Err(error) => {
                    tracing::warn!(%error, "preferences document is corrupt; using defaults");
                    Preferences::default()
                }
            },
            None => Preferences::default(),
        }
    }

    /// Shallow merge: each key in `updates` replaces the stored value for
    /// that key, other keys are untouched.
    pub fn update_preferences(&self, updates: Map<String, Value>) -> bool {
        let current = self.user_preferences();
        let mut merged = match serde_json::to_value(&current) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!("preferences did not serialize to an object");
                return false;
            }
        };
        for (key, value) in updates {
            merged.insert(key, value);
        }

        let preferences: Preferences = match serde_json::from_value(Value::Object(merged)) {
            Ok(preferences) => preferences,
            Err(error) => {
                tracing::warn!(%error, "rejecting preference update with mistyped fields");
                return false;
            }
        };

        if !self.write_json(DocumentKey::Preferences, &preferences) {
            return false;
        }
        self.events
            .emit(&StorageEvent::PreferencesUpdated(preferences));
        true
    }

    pub fn set_preference(&self, key: &str, value: Value) -> bool {
        let mut updates = Map::new();
        updates.insert(key.to_owned(), value);
        self.update_preferences(updates)
    }

    /// Looks up one preference key in the merged document, falling back to
    /// `default` for keys that are not present.
    pub fn preference(&self, key: &str, default: Value) -> Value {
        match serde_json::to_value(self.user_preferences()) {
            Ok(Value::Object(map)) => map.get(key).cloned().unwrap_or(default),
            _ => default,
        }
    }

    pub fn reset_preferences(&self) -> bool {
        if !self.write_json(DocumentKey::Preferences, &Preferences::default()) {
            return false;
        }
        self.events.emit(&StorageEvent::PreferencesReset);
        true
    }

    // ---- itineraries ----

    pub fn itineraries(&self) -> Vec<Itinerary> {
        self.read_list(DocumentKey::Itineraries)
    }

    pub fn save_itinerary(&self, itinerary: Itinerary) -> bool {
        let mut itineraries = self.itineraries();
        itineraries.push(itinerary.clone());
        if !self.write_list(DocumentKey::Itineraries, &itineraries) {
            return false;
        }
        self.events.emit(&StorageEvent::ItinerarySaved(itinerary));
        true
    }

    // ---- bulk operations ----

    pub fn export_data(&self) -> ExportBundle {
        ExportBundle {
            favorites: self.favorites(),
            search_history: self.search_history(MAX_HISTORY),
            preferences: self.user_preferences(),
            export_date: OffsetDateTime::now_utc(),
        }
    }

    /// Replaces each document whose field is present in `data`. A partial
    /// import leaves the other documents as they were.
    pub fn import_data(&self, data: ImportData) -> bool {
        if let Some(favorites) = &data.favorites {
            if !self.write_list(DocumentKey::Favorites, favorites) {
                return false;
            }
        }
        if let Some(history) = &data.search_history {
            if !self.write_list(DocumentKey::SearchHistory, history) {
                return false;
            }
        }
        if let Some(preferences) = &data.preferences {
            if !self.write_json(DocumentKey::Preferences, preferences) {
                return false;
            }
        }

        self.events.emit(&StorageEvent::DataImported);
        true
    }

    /// Removes the favorites, history, and preferences documents.
    pub fn clear_all_data(&self) -> bool {
        let cleared = self.remove_quietly(DocumentKey::Favorites)
            && self.remove_quietly(DocumentKey::SearchHistory)
            && self.remove_quietly(DocumentKey::Preferences);
        if !cleared {
            return false;
        }
        self.events.emit(&StorageEvent::AllDataCleared);
        true
    }

    // ---- diagnostics ----

    pub fn storage_stats(&self) -> StorageStats {
        let preference_keys = match serde_json::to_value(self.user_preferences()) {
            Ok(Value::Object(map)) => map.len(),
            _ => 0,
        };
        StorageStats {
            favorites: self.favorites().len(),
            search_history: self.search_history(MAX_HISTORY).len(),
            preference_keys,
            estimated_size_bytes: self.estimated_size(),
        }
    }

    /// Bytes across the serialized favorites, history, and preferences
    /// documents.
    pub fn estimated_size(&self) -> usize {
        [
            DocumentKey::Favorites,
            DocumentKey::SearchHistory,
            DocumentKey::Preferences,
        ]
        .into_iter()
        .map(|key| match self.store.document_len(key) {
            Ok(length) => length,
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "failed to size document");
                0
            }
        })
        .sum()
    }

    // ---- document plumbing ----

    fn read_raw(&self, key: DocumentKey) -> Option<String> {
        match self.store.read_document(key) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "failed to read document");
                None
            }
        }
    }

    fn read_list<T: for<'de> Deserialize<'de>>(&self, key: DocumentKey) -> Vec<T> {
        let Some(body) = self.read_raw(key) else {
            return Vec::new();
        };
        match serde_json::from_str(&body) {
            Ok(list) => list,
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "document is corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: DocumentKey, value: &T) -> bool {
        let body = match serde_json::to_string(value) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "failed to serialize document");
                return false;
            }
        };
        match self.store.write_document(key, &body) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "failed to persist document");
                false
            }
        }
    }

    fn write_list<T: Serialize>(&self, key: DocumentKey, list: &[T]) -> bool {
        self.write_json(key, &list)
    }

    fn remove_quietly(&self, key: DocumentKey) -> bool {
        match self.store.remove_document(key) {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "failed to remove document");
                false
            }
        }
    }
}
