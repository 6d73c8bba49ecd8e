// dqgate-core/src/domain/report/render.rs

use std::fmt;

use crate::domain::report::report::QualityReport;

const RULE_WIDTH: usize = 70;

/// Human-readable view of a report, one status line per check.
pub fn render_report(report: &QualityReport) -> String {
    report.to_string()
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "\n{}", rule)?;
        writeln!(f, "  DATA QUALITY REPORT: {}", self.entity.to_uppercase())?;
        writeln!(
            f,
            "  Date: {}  |  Status: {} {}",
            self.process_date,
            self.overall_status.icon(),
            self.overall_status
        )?;
        writeln!(f, "  Report: {}", self.report_id)?;
        writeln!(f, "{}", rule)?;

        if let Some(sv) = &self.schema_validation {
            writeln!(f, "\n  📋 Schema Validation: {} {}", sv.status.icon(), sv.status)?;
            writeln!(
                f,
                "     Valid: {} / {} ({:.2}%)",
                sv.valid_records, sv.total_records, sv.validity_percentage
            )?;
            if sv.schema_missing {
                writeln!(f, "     No schema registered for '{}'", sv.entity)?;
            }
            for sample in &sv.error_samples {
                if let Some(first) = sample.errors.first() {
                    writeln!(f, "     #{}: {}", sample.record_index, first)?;
                }
            }
        }

        if let Some(dq) = &self.data_quality {
            writeln!(f, "\n  🔍 Data Quality: {} {}", dq.overall_status.icon(), dq.overall_status)?;
            writeln!(
                f,
                "     Checks: {}  Passed: {}  Warnings: {}  Failed: {}",
                dq.total_checks, dq.passed, dq.warnings, dq.failed
            )?;
            for check in &dq.checks {
                writeln!(f, "     {} {}: {}", check.status.icon(), check.check_name, check.status)?;
            }
        }

        writeln!(f, "\n{}", rule)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::{QualityChecker, ThresholdConfig};
    use crate::domain::schema::BatchValidationSummary;
    use crate::domain::status::CheckStatus;
    use chrono::{NaiveDate, Utc};
    use datafusion::arrow::array::{ArrayRef, Int64Array};
    use datafusion::arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    #[test]
    fn test_render_lists_every_check_with_icon() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![Some(1), None]));
        let batch = RecordBatch::try_from_iter(vec![("id", array)]).unwrap();
        let mut checker = QualityChecker::new(ThresholdConfig::default()).unwrap();
        checker.check_nulls(&batch, &["id"]);
        checker.check_duplicates(&batch, &["id"]);

        let schema = BatchValidationSummary {
            entity: "orders".into(),
            total_records: 2,
            valid_records: 2,
            invalid_records: 0,
            validity_percentage: 100.0,
            status: CheckStatus::Pass,
            error_samples: Vec::new(),
            schema_missing: false,
        };
        let report = QualityReport::new(
            "orders",
            Some(schema),
            Some(checker.get_summary()),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Utc::now(),
        );

        let text = render_report(&report);
        assert!(text.contains("DATA QUALITY REPORT: ORDERS"));
        assert!(text.contains("Valid: 2 / 2"));
        assert!(text.contains("❌ null_check: FAIL"));
        assert!(text.contains("✅ duplicate_check: PASS"));
        assert!(text.contains("Status: ❌ FAIL"));
    }
}
