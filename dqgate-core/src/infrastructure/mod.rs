// dqgate-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;

pub use adapters::{InMemoryArtifactStore, LocalArtifactStore, records_to_table};
