// dqgate-core/src/domain/schema/validator.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::domain::error::DomainError;
use crate::domain::round2;
use crate::domain::schema::definition::{CompiledSchema, EntitySchema, Record};
use crate::domain::status::CheckStatus;

/// Invalid records kept while scanning a batch.
pub const MAX_ERROR_DETAILS: usize = 100;
/// Invalid records exposed in the summary.
pub const MAX_ERROR_SAMPLES: usize = 10;
/// Key/value pairs copied from an invalid record into its sample.
pub const RECORD_SAMPLE_FIELDS: usize = 5;

pub const MISSING_SCHEMA_MESSAGE: &str = "no schema found for entity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRecordDetail {
    pub record_index: usize,
    pub errors: Vec<String>,
    pub record_sample: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchValidationSummary {
    pub entity: String,
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub validity_percentage: f64,
    pub status: CheckStatus,
    pub error_samples: Vec<InvalidRecordDetail>,
    /// Set when the entity had no schema at all (configuration error, not bad data).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub schema_missing: bool,
}

/// A record that failed schema validation, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_index: Option<usize>,
    pub errors: Vec<String>,
    pub record: Record,
}

impl From<Record> for RejectedRecord {
    fn from(record: Record) -> Self {
        Self {
            record_index: None,
            errors: Vec::new(),
            record,
        }
    }
}

/// Valid/invalid split of one batch, plus its summary.
#[derive(Debug, Clone)]
pub struct BatchPartition {
    pub summary: BatchValidationSummary,
    pub valid: Vec<Record>,
    pub rejected: Vec<RejectedRecord>,
}

/// Validates records against the schema declared for their entity.
/// Schemas are compiled once at construction and never mutated.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    schemas: HashMap<String, CompiledSchema>,
}

impl SchemaValidator {
    pub fn new<I>(schemas: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = EntitySchema>,
    {
        let mut compiled = HashMap::new();
        for schema in schemas {
            let c = schema.try_compile()?;
            if compiled.contains_key(&c.entity) {
                return Err(DomainError::SchemaError(format!(
                    "entity '{}' is defined more than once",
                    c.entity
                )));
            }
            info!(entity = %c.entity, version = c.version, "Loaded schema");
            compiled.insert(c.entity.clone(), c);
        }
        Ok(Self { schemas: compiled })
    }

    /// Entities with a loaded schema, sorted.
    pub fn available_entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        entities.sort_unstable();
        entities
    }

    pub fn schema(&self, entity: &str) -> Option<&CompiledSchema> {
        self.schemas.get(entity)
    }

    /// Returns `(is_valid, errors)`. Pure: the record is only read.
    pub fn validate_record(&self, record: &Record, entity: &str) -> (bool, Vec<String>) {
        let Some(schema) = self.schemas.get(entity) else {
            return (false, vec![format!("{}: {}", MISSING_SCHEMA_MESSAGE, entity)]);
        };

        let instance = Value::Object(record.clone());
        let errors: Vec<String> = schema
            .validator
            .iter_errors(&instance)
            .map(|e| format!("{}: {}", json_path(&e.instance_path().to_string()), e))
            .collect();
        (errors.is_empty(), errors)
    }

    pub fn validate_batch(&self, records: &[Record], entity: &str) -> BatchValidationSummary {
        self.scan(records, entity, |_, _| {})
    }

    /// Same verdict as `validate_batch`, also returning the valid and rejected records.
    pub fn partition_batch(&self, records: &[Record], entity: &str) -> BatchPartition {
        let mut valid = Vec::new();
        let mut rejected = Vec::new();
        let summary = self.scan(records, entity, |i, errors| match errors {
            None => valid.push(records[i].clone()),
            Some(errors) => rejected.push(RejectedRecord {
                record_index: Some(i),
                errors,
                record: records[i].clone(),
            }),
        });
        BatchPartition {
            summary,
            valid,
            rejected,
        }
    }

    fn scan<F>(&self, records: &[Record], entity: &str, mut on_record: F) -> BatchValidationSummary
    where
        F: FnMut(usize, Option<Vec<String>>),
    {
        let schema_missing = !self.schemas.contains_key(entity);
        if schema_missing {
            error!(entity, "No schema loaded for entity, every record will be rejected");
        }

        let total = records.len();
        let mut valid_count = 0;
        let mut details: Vec<InvalidRecordDetail> = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let (is_valid, errors) = self.validate_record(record, entity);
            if is_valid {
                valid_count += 1;
                on_record(i, None);
                continue;
            }

            if details.len() < MAX_ERROR_DETAILS {
                details.push(InvalidRecordDetail {
                    record_index: i,
                    errors: errors.clone(),
                    record_sample: record
                        .iter()
                        .take(RECORD_SAMPLE_FIELDS)
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                });
            }
            on_record(i, Some(errors));
        }

        let invalid_count = total - valid_count;
        // An empty batch divides by 1 and reports 0%.
        let validity = valid_count as f64 / total.max(1) as f64 * 100.0;
        details.truncate(MAX_ERROR_SAMPLES);

        debug!(entity, total, valid_count, invalid_count, "Schema validation finished");

        BatchValidationSummary {
            entity: entity.to_string(),
            total_records: total,
            valid_records: valid_count,
            invalid_records: invalid_count,
            validity_percentage: round2(validity),
            status: if invalid_count == 0 {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            },
            error_samples: details,
            schema_missing,
        }
    }
}

/// Render a JSON pointer (`/items/2/sku`) as a JSON path (`$.items[2].sku`).
pub fn json_path(pointer: &str) -> String {
    let mut path = String::from("$");
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            path.push('.');
            path.push_str(&segment);
        }
    }
    path
}
