// dqgate-core/src/infrastructure/adapters/arrow_table.rs

// Records arrive as JSON-like maps; checks run over Arrow columns.
// The schema is inferred from the records themselves.

use std::sync::Arc;

use datafusion::arrow::json::ReaderBuilder;
use datafusion::arrow::json::reader::infer_json_schema_from_iterator;
use datafusion::arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;

use crate::domain::error::DomainError;
use crate::domain::schema::Record;

/// Build one record batch from a slice of records.
///
/// Column types are inferred across all records; a field absent from a
/// record becomes a null cell. Scalars of a column inferred as text are
/// coerced to their string form.
pub fn records_to_table(records: &[Record]) -> Result<RecordBatch, DomainError> {
    let schema = infer_json_schema_from_iterator(records.iter().map(|r| Ok(Value::Object(r.clone()))))
        .map_err(|e| DomainError::TableConversion(format!("schema inference failed: {}", e)))?;
    let schema = Arc::new(schema);

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    // Records without any field still count as rows.
    if schema.fields().is_empty() {
        let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
        return RecordBatch::try_new_with_options(schema, Vec::new(), &options)
            .map_err(|e| DomainError::TableConversion(e.to_string()));
    }

    let mut decoder = ReaderBuilder::new(schema.clone())
        .with_batch_size(records.len())
        .with_coerce_primitive(true)
        .build_decoder()
        .map_err(|e| DomainError::TableConversion(e.to_string()))?;

    decoder
        .serialize(records)
        .map_err(|e| DomainError::TableConversion(e.to_string()))?;

    match decoder
        .flush()
        .map_err(|e| DomainError::TableConversion(e.to_string()))?
    {
        Some(batch) => Ok(batch),
        None => Ok(RecordBatch::new_empty(schema)),
    }
}

/// Copy of `records` with every object or array value replaced by its JSON
/// text, so that fields mixing nested and scalar values still form a column.
pub fn flatten_nested(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::Object(_) | Value::Array(_) => Value::String(v.to_string()),
                        other => other.clone(),
                    };
                    (k.clone(), v)
                })
                .collect()
        })
        .collect()
}
