// dqgate-core/src/domain/quality/duplicates.rs

use std::collections::HashSet;

use datafusion::arrow::array::ArrayRef;
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::row::{RowConverter, SortField};
use serde::Serialize;

use crate::domain::quality::result::CheckOutcome;
use crate::domain::quality::table;
use crate::domain::quality::thresholds::ThresholdConfig;
use crate::domain::round2;
use crate::domain::schema::Record;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "duplicate_check";
pub const MAX_DUPLICATE_SAMPLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateCheckDetails {
    pub total_records: usize,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
    pub threshold: f64,
    pub key_columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sample_duplicates: Vec<Record>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Rows sharing identical values across `key_columns` are duplicates; the
/// first occurrence of each key is kept. No key columns means the whole row.
pub fn evaluate<S: AsRef<str>>(
    batch: &RecordBatch,
    key_columns: &[S],
    thresholds: &ThresholdConfig,
) -> CheckOutcome<DuplicateCheckDetails> {
    let total = batch.num_rows();
    let keys: Vec<String> = if key_columns.is_empty() {
        batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    } else {
        key_columns.iter().map(|k| k.as_ref().to_string()).collect()
    };

    let mut details = DuplicateCheckDetails {
        total_records: total,
        duplicate_count: 0,
        duplicate_percentage: 0.0,
        threshold: thresholds.duplicate_percentage_max,
        key_columns: keys.clone(),
        sample_duplicates: Vec::new(),
        missing_columns: Vec::new(),
        reason: None,
    };

    details.missing_columns = keys
        .iter()
        .filter(|k| table::column(batch, k).is_none())
        .cloned()
        .collect();
    if !details.missing_columns.is_empty() {
        details.reason = Some(format!(
            "Key columns missing: {}",
            details.missing_columns.join(", ")
        ));
        return CheckOutcome {
            status: CheckStatus::Fail,
            details,
        };
    }

    let arrays: Vec<ArrayRef> = keys
        .iter()
        .filter_map(|k| table::column(batch, k).cloned())
        .collect();

    let duplicate_rows = match duplicate_row_indices(&arrays) {
        Ok(rows) => rows,
        Err(e) => {
            details.reason = Some(format!("Unable to compare key columns: {}", e));
            return CheckOutcome {
                status: CheckStatus::Fail,
                details,
            };
        }
    };

    let dup_count = duplicate_rows.len();
    let dup_pct = if total > 0 {
        dup_count as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    details.duplicate_count = dup_count;
    details.duplicate_percentage = round2(dup_pct);
    details.sample_duplicates = duplicate_rows
        .iter()
        .take(MAX_DUPLICATE_SAMPLES)
        .map(|&row| {
            keys.iter()
                .zip(&arrays)
                .map(|(k, a)| (k.clone(), table::cell_value(a, row)))
                .collect()
        })
        .collect();

    let status = if dup_pct > thresholds.duplicate_percentage_max {
        CheckStatus::Fail
    } else if dup_pct > 0.0 {
        CheckStatus::Warn
    } else {
        CheckStatus::Pass
    };

    CheckOutcome { status, details }
}

/// Indices of every row whose key was already seen earlier in the batch.
fn duplicate_row_indices(arrays: &[ArrayRef]) -> Result<Vec<usize>, ArrowError> {
    if arrays.is_empty() {
        return Ok(Vec::new());
    }
    let fields = arrays
        .iter()
        .map(|a| SortField::new(a.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(arrays)?;

    let mut seen = HashSet::with_capacity(rows.num_rows());
    Ok(rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| (!seen.insert(row)).then_some(i))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{Int64Array, StringArray};
    use serde_json::Value;
    use std::sync::Arc;

    fn batch(ids: Vec<i64>, vals: Vec<&str>) -> RecordBatch {
        let ids: ArrayRef = Arc::new(Int64Array::from(ids));
        let vals: ArrayRef = Arc::new(StringArray::from(vals));
        RecordBatch::try_from_iter(vec![("id", ids), ("val", vals)]).unwrap()
    }

    #[test]
    fn test_unique_keys_pass() {
        let b = batch(vec![1, 2, 3], vec!["a", "b", "c"]);
        let out = evaluate(&b, &["id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Pass);
        assert_eq!(out.details.duplicate_count, 0);
        assert!(out.details.sample_duplicates.is_empty());
    }

    #[test]
    fn test_first_occurrence_is_not_counted() {
        let b = batch(vec![1, 1, 2, 3, 4], vec!["x", "x", "y", "z", "w"]);
        let out = evaluate(&b, &["id"], &ThresholdConfig::default());
        assert_eq!(out.details.duplicate_count, 1);
        assert_eq!(out.details.duplicate_percentage, 20.0);
        assert_eq!(out.status, CheckStatus::Fail);
        assert_eq!(out.details.sample_duplicates[0]["id"], Value::from(1));
    }

    #[test]
    fn test_duplicates_within_threshold_warn() {
        let mut ids: Vec<i64> = (0..200).collect();
        ids[199] = 0;
        let vals = vec!["v"; 200];
        let out = evaluate(&batch(ids, vals), &["id"], &ThresholdConfig::default());
        assert_eq!(out.details.duplicate_percentage, 0.5);
        assert_eq!(out.status, CheckStatus::Warn);
    }

    #[test]
    fn test_composite_key_and_sample_cap() {
        let b = batch(vec![1; 8], vec!["a", "a", "a", "a", "a", "a", "a", "b"]);
        let out = evaluate(&b, &["id", "val"], &ThresholdConfig::default());
        assert_eq!(out.details.duplicate_count, 6);
        assert_eq!(out.details.sample_duplicates.len(), MAX_DUPLICATE_SAMPLES);
        assert_eq!(out.details.sample_duplicates[0].len(), 2);
    }

    #[test]
    fn test_no_key_columns_compares_whole_rows() {
        let b = batch(vec![1, 1, 1], vec!["a", "b", "a"]);
        let none: [&str; 0] = [];
        let out = evaluate(&b, &none, &ThresholdConfig::default());
        assert_eq!(out.details.duplicate_count, 1);
        assert_eq!(out.details.key_columns, vec!["id", "val"]);
    }

    #[test]
    fn test_missing_key_column_fails() {
        let b = batch(vec![1], vec!["a"]);
        let out = evaluate(&b, &["order_id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Fail);
        assert_eq!(out.details.missing_columns, vec!["order_id"]);
        assert!(out.details.reason.is_some());
    }
}
