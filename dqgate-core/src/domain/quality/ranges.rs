// dqgate-core/src/domain/quality/ranges.rs

use std::collections::BTreeMap;

use datafusion::arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::domain::quality::result::CheckOutcome;
use crate::domain::quality::table;
use crate::domain::round2;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "range_check";

/// Inclusive bounds for one numeric column. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl RangeRule {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    fn violated_by(&self, v: f64) -> bool {
        self.min.is_some_and(|min| v < min) || self.max.is_some_and(|max| v > max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRangeResult {
    pub status: CheckStatus,
    pub expected_range: RangeRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ColumnRangeResult {
    fn failed(rule: RangeRule, reason: String) -> Self {
        Self {
            status: CheckStatus::Fail,
            expected_range: rule,
            violations: None,
            violation_percentage: None,
            actual_min: None,
            actual_max: None,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeCheckDetails {
    pub columns_checked: usize,
    pub column_results: BTreeMap<String, ColumnRangeResult>,
}

/// Any out-of-range value fails its column; there is no warning tier.
pub fn evaluate(
    batch: &RecordBatch,
    rules: &BTreeMap<String, RangeRule>,
) -> CheckOutcome<RangeCheckDetails> {
    let rows = batch.num_rows();

    let column_results: BTreeMap<String, ColumnRangeResult> = rules
        .iter()
        .map(|(name, rule)| {
            let result = match table::column(batch, name) {
                None => ColumnRangeResult::failed(*rule, "Column missing".into()),
                Some(array) => match table::to_f64(array) {
                    Err(e) => {
                        ColumnRangeResult::failed(*rule, format!("Column is not numeric: {}", e))
                    }
                    Ok(values) => column_result(*rule, &values, rows),
                },
            };
            (name.clone(), result)
        })
        .collect();

    CheckOutcome {
        status: CheckStatus::worst(column_results.values().map(|c| c.status)),
        details: RangeCheckDetails {
            columns_checked: rules.len(),
            column_results,
        },
    }
}

fn column_result(rule: RangeRule, values: &[Option<f64>], rows: usize) -> ColumnRangeResult {
    let present: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    let violations = present.iter().filter(|v| rule.violated_by(**v)).count();
    let pct = if rows > 0 {
        violations as f64 / rows as f64 * 100.0
    } else {
        0.0
    };

    ColumnRangeResult {
        status: if violations > 0 {
            CheckStatus::Fail
        } else {
            CheckStatus::Pass
        },
        expected_range: rule,
        violations: Some(violations),
        violation_percentage: Some(round2(pct)),
        actual_min: present.iter().copied().reduce(f64::min),
        actual_max: present.iter().copied().reduce(f64::max),
        reason: None,
    }
}
