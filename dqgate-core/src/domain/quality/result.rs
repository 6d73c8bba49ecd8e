// dqgate-core/src/domain/quality/result.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::quality::conversion::ConversionDetails;
use crate::domain::quality::duplicates::DuplicateCheckDetails;
use crate::domain::quality::freshness::FreshnessDetails;
use crate::domain::quality::nulls::NullCheckDetails;
use crate::domain::quality::ranges::RangeCheckDetails;
use crate::domain::quality::referential::ReferentialDetails;
use crate::domain::quality::row_count::RowCountDetails;
use crate::domain::status::CheckStatus;

/// What a single check call hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome<D> {
    pub status: CheckStatus,
    pub details: D,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckDetails {
    Nulls(NullCheckDetails),
    Duplicates(DuplicateCheckDetails),
    Ranges(RangeCheckDetails),
    RowCount(RowCountDetails),
    Freshness(FreshnessDetails),
    Referential(ReferentialDetails),
    Conversion(ConversionDetails),
}

/// One entry of the run's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check_name: String,
    pub status: CheckStatus,
    pub timestamp: DateTime<Utc>,
    pub details: CheckDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    pub overall_status: CheckStatus,
    pub total_checks: usize,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    pub summary: String,
    pub checks: Vec<CheckResult>,
}

impl QualitySummary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let count = |s: CheckStatus| results.iter().filter(|r| r.status == s).count();
        let passed = count(CheckStatus::Pass);

        Self {
            overall_status: CheckStatus::worst(results.iter().map(|r| r.status)),
            total_checks: results.len(),
            passed,
            warnings: count(CheckStatus::Warn),
            failed: count(CheckStatus::Fail),
            summary: format!("{}/{} checks passed", passed, results.len()),
            checks: results.to_vec(),
        }
    }
}
