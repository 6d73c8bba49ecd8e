// dqgate-core/src/domain/quality/checker.rs

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use datafusion::arrow::record_batch::RecordBatch;
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::quality::conversion::{self, ConversionDetails};
use crate::domain::quality::duplicates::{self, DuplicateCheckDetails};
use crate::domain::quality::freshness::{self, FreshnessDetails};
use crate::domain::quality::nulls::{self, NullCheckDetails};
use crate::domain::quality::ranges::{self, RangeCheckDetails, RangeRule};
use crate::domain::quality::referential::{self, ReferentialDetails};
use crate::domain::quality::result::{CheckDetails, CheckOutcome, CheckResult, QualitySummary};
use crate::domain::quality::row_count::{self, RowCountDetails, RowCountExpectation};
use crate::domain::quality::thresholds::ThresholdConfig;
use crate::domain::status::CheckStatus;

/// Runs table-level checks for one batch and keeps the ordered audit trail.
///
/// Every check appends exactly one [`CheckResult`] and never short-circuits
/// the others. A checker is scoped to a single run: create a fresh one per
/// batch rather than sharing it across tasks.
#[derive(Debug, Default)]
pub struct QualityChecker {
    thresholds: ThresholdConfig,
    results: Vec<CheckResult>,
}

impl QualityChecker {
    pub fn new(thresholds: ThresholdConfig) -> Result<Self, DomainError> {
        thresholds.ensure_valid()?;
        Ok(Self {
            thresholds,
            results: Vec::new(),
        })
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn check_nulls<S: AsRef<str>>(
        &mut self,
        table: &RecordBatch,
        required_columns: &[S],
    ) -> CheckOutcome<NullCheckDetails> {
        let outcome = nulls::evaluate(table, required_columns, &self.thresholds);
        self.record(nulls::CHECK_NAME, outcome, CheckDetails::Nulls)
    }

    pub fn check_duplicates<S: AsRef<str>>(
        &mut self,
        table: &RecordBatch,
        key_columns: &[S],
    ) -> CheckOutcome<DuplicateCheckDetails> {
        let outcome = duplicates::evaluate(table, key_columns, &self.thresholds);
        self.record(duplicates::CHECK_NAME, outcome, CheckDetails::Duplicates)
    }

    pub fn check_ranges(
        &mut self,
        table: &RecordBatch,
        rules: &BTreeMap<String, RangeRule>,
    ) -> CheckOutcome<RangeCheckDetails> {
        let outcome = ranges::evaluate(table, rules);
        self.record(ranges::CHECK_NAME, outcome, CheckDetails::Ranges)
    }

    pub fn check_row_count(
        &mut self,
        table: &RecordBatch,
        expectation: RowCountExpectation,
    ) -> CheckOutcome<RowCountDetails> {
        let outcome = row_count::evaluate(table.num_rows() as u64, expectation, &self.thresholds);
        self.record(row_count::CHECK_NAME, outcome, CheckDetails::RowCount)
    }

    pub fn check_freshness(
        &mut self,
        table: &RecordBatch,
        timestamp_column: &str,
    ) -> CheckOutcome<FreshnessDetails> {
        self.check_freshness_at(table, timestamp_column, Utc::now())
    }

    /// Freshness against an explicit clock.
    pub fn check_freshness_at(
        &mut self,
        table: &RecordBatch,
        timestamp_column: &str,
        now: DateTime<Utc>,
    ) -> CheckOutcome<FreshnessDetails> {
        let outcome = freshness::evaluate(table, timestamp_column, &self.thresholds, now);
        self.record(freshness::CHECK_NAME, outcome, CheckDetails::Freshness)
    }

    pub fn check_referential_integrity(
        &mut self,
        table: &RecordBatch,
        column: &str,
        reference_set: &HashSet<String>,
    ) -> CheckOutcome<ReferentialDetails> {
        let outcome = referential::evaluate(table, column, reference_set);
        self.record(referential::CHECK_NAME, outcome, CheckDetails::Referential)
    }

    /// Records that the batch could not be materialised as a table.
    pub fn record_conversion_failure(
        &mut self,
        records: usize,
        error: &str,
        fallback_used: bool,
    ) -> CheckOutcome<ConversionDetails> {
        let outcome = conversion::evaluate(records, error, fallback_used);
        self.record(conversion::CHECK_NAME, outcome, CheckDetails::Conversion)
    }

    /// Roll-up of everything recorded so far. Does not consume the results.
    pub fn get_summary(&self) -> QualitySummary {
        QualitySummary::from_results(&self.results)
    }

    fn record<D: Clone>(
        &mut self,
        check_name: &str,
        outcome: CheckOutcome<D>,
        wrap: fn(D) -> CheckDetails,
    ) -> CheckOutcome<D> {
        match outcome.status {
            CheckStatus::Pass => debug!(check = check_name, "{} {}", outcome.status.icon(), check_name),
            status => warn!(check = check_name, status = %status, "{} {}", status.icon(), check_name),
        }

        self.results.push(CheckResult {
            check_name: check_name.to_string(),
            status: outcome.status,
            timestamp: Utc::now(),
            details: wrap(outcome.details.clone()),
        });
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{ArrayRef, Float64Array, StringArray};
    use std::sync::Arc;

    fn checker() -> QualityChecker {
        QualityChecker::new(ThresholdConfig {
            min_row_count: 10,
            ..Default::default()
        })
        .unwrap()
    }

    fn sample() -> RecordBatch {
        let ids: ArrayRef = Arc::new(StringArray::from(
            (1..=100).map(|i| format!("CUST-{:06}", i)).collect::<Vec<_>>(),
        ));
        let amounts: ArrayRef = Arc::new(Float64Array::from(
            (1..=100).map(|i| i as f64 * 10.0).collect::<Vec<_>>(),
        ));
        RecordBatch::try_from_iter(vec![("customer_id", ids), ("amount", amounts)]).unwrap()
    }

    #[test]
    fn test_invalid_thresholds_are_rejected() {
        let res = QualityChecker::new(ThresholdConfig {
            duplicate_percentage_max: 150.0,
            ..Default::default()
        });
        assert!(matches!(res, Err(DomainError::InvalidThresholds(_))));
    }

    #[test]
    fn test_each_check_appends_one_result_in_order() {
        let mut c = checker();
        let table = sample();
        c.check_nulls(&table, &["customer_id"]);
        c.check_duplicates(&table, &["customer_id"]);
        c.check_row_count(&table, RowCountExpectation::default());
        c.check_freshness(&table, "created_at");

        let names: Vec<&str> = c.results().iter().map(|r| r.check_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["null_check", "duplicate_check", "row_count_check", "freshness_check"]
        );
    }

    #[test]
    fn test_summary_counts_and_overall_status() {
        let mut c = checker();
        let table = sample();
        c.check_nulls(&table, &["customer_id"]);
        c.check_duplicates(&table, &["customer_id"]);
        c.check_row_count(&table, RowCountExpectation::default());

        let summary = c.get_summary();
        assert_eq!(summary.overall_status, CheckStatus::Pass);
        assert_eq!(summary.total_checks, 3);
        assert_eq!(summary.summary, "3/3 checks passed");

        let rules = BTreeMap::from([("amount".to_string(), RangeRule::between(0.0, 50.0))]);
        c.check_ranges(&table, &rules);
        let summary = c.get_summary();
        assert_eq!(summary.overall_status, CheckStatus::Fail);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_checks, 4);
    }

    #[test]
    fn test_empty_summary_is_pass() {
        let summary = checker().get_summary();
        assert_eq!(summary.overall_status, CheckStatus::Pass);
        assert_eq!(summary.total_checks, 0);
        assert_eq!(summary.summary, "0/0 checks passed");
    }

    #[test]
    fn test_summary_serializes_camel_case() -> anyhow::Result<()> {
        let mut c = checker();
        let set: HashSet<String> = HashSet::new();
        c.check_referential_integrity(&sample(), "customer_id", &set);
        let json = serde_json::to_value(c.get_summary())?;
        assert_eq!(json["overallStatus"], "FAIL");
        assert_eq!(json["totalChecks"], 1);
        assert_eq!(json["checks"][0]["check_name"], "referential_integrity");
        assert_eq!(json["checks"][0]["details"]["orphaned_count"], 100);
        Ok(())
    }

    #[test]
    fn test_conversion_failure_is_recorded_as_fail() {
        let mut c = checker();
        c.check_row_count(&sample(), RowCountExpectation::default());
        let out = c.record_conversion_failure(20, "schema inference failed", true);
        assert_eq!(out.status, CheckStatus::Fail);

        let summary = c.get_summary();
        assert_eq!(summary.overall_status, CheckStatus::Fail);
        assert_eq!(summary.checks[1].check_name, "table_conversion");
        assert_eq!(
            summary.checks[1].details,
            CheckDetails::Conversion(ConversionDetails {
                records: 20,
                error: "schema inference failed".into(),
                fallback_used: true,
            })
        );
    }
}
