// dqgate-core/src/ports/mod.rs

pub mod storage;

pub use storage::ArtifactStore;
