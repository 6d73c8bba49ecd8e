// dqgate-core/src/infrastructure/adapters/mod.rs

pub mod arrow_table;
pub mod local_store;
pub mod memory_store;

pub use arrow_table::{flatten_nested, records_to_table};
pub use local_store::LocalArtifactStore;
pub use memory_store::InMemoryArtifactStore;
