// dqgate-core/src/ports/storage.rs

// Where gate artifacts land. The reporter only knows this contract; whether the
// bytes end up on a local disk, in memory or in an object store is an adapter
// concern.

use async_trait::async_trait;

use crate::infrastructure::error::StorageError;

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist `body` under `key` and return the resulting location.
    /// One call is one attempt; retries belong to the caller.
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str)
    -> Result<String, StorageError>;
}
