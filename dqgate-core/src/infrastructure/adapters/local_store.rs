// dqgate-core/src/infrastructure/adapters/local_store.rs

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::infrastructure::error::StorageError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::storage::ArtifactStore;

/// Stores artifacts as files under a root directory, one file per key.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are relative paths made only of normal components.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        let safe = !key.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::UnsafeKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.resolve(key)?;
        let location = path.display().to_string();
        debug!(%location, content_type, bytes = body.len(), "Writing artifact");

        let target = path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&target, body))
            .await
            .map_err(|e| StorageError::Io {
                location: location.clone(),
                source: std::io::Error::other(e),
            })??;

        Ok(location)
    }
}
