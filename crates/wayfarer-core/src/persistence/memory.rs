use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::CoreError;
use crate::persistence::{DocumentKey, DocumentStore, PersistenceResult};

/// Process-local document store. Backs tests and throwaway sessions where
/// durability is not wanted.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<DocumentKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, HashMap<DocumentKey, String>>> {
        self.documents
            .lock()
            .map_err(|_| CoreError::internal("memory store mutex poisoned"))
    }
}

impl DocumentStore for MemoryStore {
    fn read_document(&self, key: DocumentKey) -> PersistenceResult<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn write_document(&self, key: DocumentKey, body: &str) -> PersistenceResult<()> {
        self.lock()?.insert(key, body.to_owned());
        Ok(())
    }

    fn remove_document(&self, key: DocumentKey) -> PersistenceResult<bool> {
        Ok(self.lock()?.remove(&key).is_some())
    }
}
