pub mod memory;

pub use memory::MemoryStore;

use crate::models::CoreError;

pub type PersistenceResult<T> = Result<T, CoreError>;

/// The fixed set of documents the planner persists. Each maps to one named
/// JSON blob in whatever backend is plugged in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DocumentKey {
    Favorites,
    SearchHistory,
    Preferences,
    Itineraries,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 4] = [
        DocumentKey::Favorites,
        DocumentKey::SearchHistory,
        DocumentKey::Preferences,
        DocumentKey::Itineraries,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorites => "wayfarer_favorites",
            Self::SearchHistory => "wayfarer_search_history",
            Self::Preferences => "wayfarer_preferences",
            Self::Itineraries => "wayfarer_itineraries",
        }
    }
}

/// Key-to-JSON-document storage. Bodies are opaque strings at this layer;
/// the storage manager owns (de)serialization and corruption policy.
pub trait DocumentStore: Send + Sync {
    fn read_document(&self, key: DocumentKey) -> PersistenceResult<Option<String>>;

    fn write_document(&self, key: DocumentKey, body: &str) -> PersistenceResult<()>;

    /// Returns whether a document was actually present.
    fn remove_document(&self, key: DocumentKey) -> PersistenceResult<bool>;

    fn document_len(&self, key: DocumentKey) -> PersistenceResult<usize> {
        Ok(self
            .read_document(key)?
            .map(|body| body.len())
            .unwrap_or(0))
    }
}

pub trait MigrationStore: Send + Sync {
    fn current_version(&self) -> PersistenceResult<i64>;

    fn apply_migration(&self, target_version: i64) -> PersistenceResult<()>;
}
