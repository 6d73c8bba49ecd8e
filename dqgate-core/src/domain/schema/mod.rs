// dqgate-core/src/domain/schema/mod.rs

pub mod definition;
pub mod validator;

// Re-exports
pub use definition::{
    CompiledSchema, EntitySchema, FieldFormat, FieldSpec, FieldType, Record, SchemaFile,
};
pub use validator::{
    BatchPartition, BatchValidationSummary, InvalidRecordDetail, RejectedRecord, SchemaValidator,
    json_path,
};
