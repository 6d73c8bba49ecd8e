// dqgate-core/src/infrastructure/config/mod.rs

pub mod gate;
pub mod schema;

pub use gate::{EntityRules, GateConfig, load_gate_config};
pub use schema::{builtin_schemas, load_schema_file, load_schemas_dir};
