// dqgate-core/src/domain/quality/row_count.rs

use serde::Serialize;
use thiserror::Error;

use crate::domain::quality::result::CheckOutcome;
use crate::domain::quality::thresholds::ThresholdConfig;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "row_count_check";

/// One problem found while reconciling a batch's size.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowCountIssue {
    #[error("Row count {actual} below minimum {min}")]
    BelowMinimum { actual: u64, min: u64 },

    #[error("Row count {actual} exceeds maximum {max}")]
    AboveMaximum { actual: u64, max: u64 },

    #[error("Row count variance {variance:.1}% exceeds threshold {threshold:.1}%")]
    VarianceExceeded { variance: f64, threshold: f64 },
}

impl RowCountIssue {
    /// Drift against the previous run is visible but not blocking.
    pub fn status(&self) -> CheckStatus {
        match self {
            Self::VarianceExceeded { .. } => CheckStatus::Warn,
            _ => CheckStatus::Fail,
        }
    }
}

/// Optional bounds for a row-count check. Unset fields fall back to the
/// run's [`ThresholdConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowCountExpectation {
    pub expected_min: Option<u64>,
    pub expected_max: Option<u64>,
    pub previous_count: Option<u64>,
    pub variance_threshold_pct: Option<f64>,
}

impl RowCountExpectation {
    pub fn min(mut self, min: u64) -> Self {
        self.expected_min = Some(min);
        self
    }

    pub fn max(mut self, max: u64) -> Self {
        self.expected_max = Some(max);
        self
    }

    pub fn previous(mut self, count: u64) -> Self {
        self.previous_count = Some(count);
        self
    }

    pub fn variance_pct(mut self, pct: f64) -> Self {
        self.variance_threshold_pct = Some(pct);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowCountDetails {
    pub actual_count: u64,
    pub expected_min: u64,
    pub expected_max: Option<u64>,
    pub previous_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance_percentage: Option<f64>,
    pub variance_threshold_pct: f64,
    pub issues: Vec<String>,
}

pub fn evaluate(
    actual: u64,
    expectation: RowCountExpectation,
    thresholds: &ThresholdConfig,
) -> CheckOutcome<RowCountDetails> {
    let min = expectation.expected_min.unwrap_or(thresholds.min_row_count);
    let variance_threshold = expectation
        .variance_threshold_pct
        .unwrap_or(thresholds.row_count_variance_pct);

    let mut issues = Vec::new();

    if actual < min {
        issues.push(RowCountIssue::BelowMinimum { actual, min });
    }
    if let Some(max) = expectation.expected_max
        && actual > max
    {
        issues.push(RowCountIssue::AboveMaximum { actual, max });
    }

    // A zero or absent previous count means there is no history to compare.
    let variance = match expectation.previous_count {
        Some(prev) if prev > 0 => {
            let diff = actual.abs_diff(prev);
            Some(diff as f64 / prev as f64 * 100.0)
        }
        _ => None,
    };
    if let Some(v) = variance
        && v > variance_threshold
    {
        issues.push(RowCountIssue::VarianceExceeded {
            variance: v,
            threshold: variance_threshold,
        });
    }

    CheckOutcome {
        status: CheckStatus::worst(issues.iter().map(RowCountIssue::status)),
        details: RowCountDetails {
            actual_count: actual,
            expected_min: min,
            expected_max: expectation.expected_max,
            previous_count: expectation.previous_count,
            variance_percentage: variance.map(crate::domain::round2),
            variance_threshold_pct: variance_threshold,
            issues: issues.iter().map(ToString::to_string).collect(),
        },
    }
}
