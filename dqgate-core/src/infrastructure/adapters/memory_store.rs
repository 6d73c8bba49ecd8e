// dqgate-core/src/infrastructure/adapters/memory_store.rs

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::infrastructure::error::StorageError;
use crate::ports::storage::ArtifactStore;

pub const MEMORY_SCHEME: &str = "memory://";

/// Process-local store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactStore {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let location = format!("{}{}", MEMORY_SCHEME, key);
        let mut objects = self.objects.lock().map_err(|e| StorageError::Unavailable {
            location: location.clone(),
            reason: e.to_string(),
        })?;
        objects.insert(key.to_string(), body);
        Ok(location)
    }
}
