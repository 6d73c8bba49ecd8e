// dqgate-core/src/domain/quality/nulls.rs

use datafusion::arrow::array::Array;
use datafusion::arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::domain::quality::result::CheckOutcome;
use crate::domain::quality::table;
use crate::domain::quality::thresholds::ThresholdConfig;
use crate::domain::round2;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "null_check";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNullResult {
    pub column: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_count: Option<usize>,
    pub null_percentage: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullCheckDetails {
    pub columns_checked: usize,
    pub column_results: Vec<ColumnNullResult>,
}

pub fn evaluate<S: AsRef<str>>(
    batch: &RecordBatch,
    required_columns: &[S],
    thresholds: &ThresholdConfig,
) -> CheckOutcome<NullCheckDetails> {
    let rows = batch.num_rows();
    let max = thresholds.null_percentage_max;

    let column_results: Vec<ColumnNullResult> = required_columns
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let Some(array) = table::column(batch, name) else {
                // An absent column counts as entirely missing.
                return ColumnNullResult {
                    column: name.to_string(),
                    status: CheckStatus::Fail,
                    reason: Some("Column missing".into()),
                    null_count: None,
                    null_percentage: 100.0,
                    threshold: max,
                };
            };

            // Logical count: an all-null JSON column decodes as `DataType::Null`,
            // which carries no validity buffer.
            let null_count = array.logical_null_count();
            let null_pct = if rows > 0 {
                null_count as f64 / rows as f64 * 100.0
            } else {
                0.0
            };

            let status = if null_pct > max {
                CheckStatus::Fail
            } else if null_pct > 0.0 {
                CheckStatus::Warn
            } else {
                CheckStatus::Pass
            };

            ColumnNullResult {
                column: name.to_string(),
                status,
                reason: None,
                null_count: Some(null_count),
                null_percentage: round2(null_pct),
                threshold: max,
            }
        })
        .collect();

    CheckOutcome {
        status: CheckStatus::worst(column_results.iter().map(|c| c.status)),
        details: NullCheckDetails {
            columns_checked: required_columns.len(),
            column_results,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{ArrayRef, Int64Array, NullArray};
    use std::sync::Arc;

    fn ids(values: Vec<Option<i64>>) -> RecordBatch {
        let array: ArrayRef = Arc::new(Int64Array::from(values));
        RecordBatch::try_from_iter(vec![("id", array)]).unwrap()
    }

    #[test]
    fn test_no_nulls_pass() {
        let batch = ids((1..=10).map(Some).collect());
        let out = evaluate(&batch, &["id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Pass);
        assert_eq!(out.details.column_results[0].null_count, Some(0));
    }

    #[test]
    fn test_nulls_within_threshold_warn() {
        let mut values: Vec<Option<i64>> = (1..=100).map(Some).collect();
        values[3] = None;
        values[50] = None;
        let out = evaluate(&ids(values), &["id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Warn);
        assert_eq!(out.details.column_results[0].null_percentage, 2.0);
    }

    #[test]
    fn test_nulls_above_threshold_fail() {
        let batch = ids(vec![
            Some(1), Some(2), None, None, None, None, Some(7), Some(8), Some(9), Some(10),
        ]);
        let out = evaluate(&batch, &["id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Fail);
        assert_eq!(out.details.column_results[0].null_percentage, 40.0);
    }

    #[test]
    fn test_exactly_at_threshold_is_warn_not_fail() {
        let mut values: Vec<Option<i64>> = (1..=20).map(Some).collect();
        values[0] = None; // 5%
        let out = evaluate(&ids(values), &["id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Warn);
    }

    #[test]
    fn test_missing_column_fails_and_dominates() {
        let batch = ids(vec![Some(1), None]);
        let out = evaluate(&batch, &["id", "email"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Fail);
        assert_eq!(out.details.columns_checked, 2);
        let missing = &out.details.column_results[1];
        assert_eq!(missing.reason.as_deref(), Some("Column missing"));
        assert_eq!(missing.null_percentage, 100.0);
    }

    #[test]
    fn test_empty_table_is_zero_percent() {
        let batch = ids(vec![]);
        let out = evaluate(&batch, &["id"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Pass);
        assert_eq!(out.details.column_results[0].null_percentage, 0.0);
    }

    #[test]
    fn test_untyped_all_null_column_fails() {
        let array: ArrayRef = Arc::new(NullArray::new(20));
        let batch = RecordBatch::try_from_iter(vec![("email", array)]).unwrap();
        let out = evaluate(&batch, &["email"], &ThresholdConfig::default());
        assert_eq!(out.status, CheckStatus::Fail);
        assert_eq!(out.details.column_results[0].null_count, Some(20));
        assert_eq!(out.details.column_results[0].null_percentage, 100.0);
    }
}
