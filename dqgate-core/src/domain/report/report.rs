// dqgate-core/src/domain/report/report.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::quality::QualitySummary;
use crate::domain::schema::BatchValidationSummary;
use crate::domain::status::CheckStatus;

pub const REPORT_PREFIX: &str = "quality-reports";

/// Terminal artifact of one gate run. Built once, persisted once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub report_id: String,
    pub entity: String,
    pub process_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub schema_validation: Option<BatchValidationSummary>,
    pub data_quality: Option<QualitySummary>,
    pub overall_status: CheckStatus,
}

impl QualityReport {
    /// A skipped phase contributes no status; with neither phase the report passes.
    pub fn new(
        entity: &str,
        schema_results: Option<BatchValidationSummary>,
        quality_results: Option<QualitySummary>,
        process_date: NaiveDate,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let overall_status = CheckStatus::worst(
            schema_results
                .as_ref()
                .map(|s| s.status)
                .into_iter()
                .chain(quality_results.as_ref().map(|q| q.overall_status)),
        );

        Self {
            report_id: run_id(entity, process_date, generated_at),
            entity: entity.to_string(),
            process_date,
            generated_at,
            schema_validation: schema_results,
            data_quality: quality_results,
            overall_status,
        }
    }

    /// Storage key, partitioned by entity and generation date.
    pub fn storage_key(&self) -> String {
        format!(
            "{}/{}/{}/{}.json",
            REPORT_PREFIX,
            key_segment(&self.entity),
            date_partition(self.generated_at),
            self.report_id
        )
    }
}

/// `{entity}-{process_date}-{HHMMSSmmm}`
pub fn run_id(entity: &str, process_date: NaiveDate, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}",
        key_segment(entity),
        process_date.format("%Y-%m-%d"),
        at.format("%H%M%S%3f")
    )
}

/// Values that end up in object keys are kept to `[A-Za-z0-9_-]`, so an
/// entity or reason can never add or escape a partition level.
pub fn key_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unspecified".into()
    } else {
        cleaned
    }
}

pub(crate) fn date_partition(at: DateTime<Utc>) -> String {
    at.format("year=%Y/month=%m/day=%d").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 16, 3, 4, 5).unwrap() + chrono::Duration::milliseconds(42)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn schema_summary(status: CheckStatus) -> BatchValidationSummary {
        BatchValidationSummary {
            entity: "customer".into(),
            total_records: 1,
            valid_records: 1,
            invalid_records: 0,
            validity_percentage: 100.0,
            status,
            error_samples: Vec::new(),
            schema_missing: false,
        }
    }

    fn quality_summary(status: CheckStatus) -> QualitySummary {
        QualitySummary {
            overall_status: status,
            total_checks: 0,
            passed: 0,
            warnings: 0,
            failed: 0,
            summary: "0/0 checks passed".into(),
            checks: Vec::new(),
        }
    }

    #[test]
    fn test_report_id_and_key_layout() {
        let r = QualityReport::new("customer", None, None, date(), at());
        assert_eq!(r.report_id, "customer-2025-01-15-030405042");
        assert_eq!(
            r.storage_key(),
            "quality-reports/customer/year=2025/month=01/day=16/customer-2025-01-15-030405042.json"
        );
    }

    #[test]
    fn test_key_segment() {
        assert_eq!(key_segment("schema_validation"), "schema_validation");
        assert_eq!(key_segment("../etc/passwd"), "___etc_passwd");
        assert_eq!(key_segment("bad email!"), "bad_email_");
        assert_eq!(key_segment("  "), "unspecified");
    }

    #[test]
    fn test_entity_with_separator_stays_one_partition() {
        let r = QualityReport::new("sales/eu", None, None, date(), at());
        assert_eq!(r.entity, "sales/eu");
        assert_eq!(r.report_id, "sales_eu-2025-01-15-030405042");
        assert_eq!(
            r.storage_key(),
            "quality-reports/sales_eu/year=2025/month=01/day=16/sales_eu-2025-01-15-030405042.json"
        );
    }

    #[test]
    fn test_overall_is_worst_of_present_phases() {
        let both = QualityReport::new(
            "customer",
            Some(schema_summary(CheckStatus::Pass)),
            Some(quality_summary(CheckStatus::Warn)),
            date(),
            at(),
        );
        assert_eq!(both.overall_status, CheckStatus::Warn);

        let schema_fail = QualityReport::new(
            "customer",
            Some(schema_summary(CheckStatus::Fail)),
            Some(quality_summary(CheckStatus::Warn)),
            date(),
            at(),
        );
        assert_eq!(schema_fail.overall_status, CheckStatus::Fail);
    }

    #[test]
    fn test_absent_phases_default_to_pass() {
        let none = QualityReport::new("customer", None, None, date(), at());
        assert_eq!(none.overall_status, CheckStatus::Pass);

        let quality_only =
            QualityReport::new("customer", None, Some(quality_summary(CheckStatus::Fail)), date(), at());
        assert_eq!(quality_only.overall_status, CheckStatus::Fail);
    }

    #[test]
    fn test_serialized_shape() -> anyhow::Result<()> {
        let r = QualityReport::new("customer", None, Some(quality_summary(CheckStatus::Pass)), date(), at());
        let json = serde_json::to_value(&r)?;
        assert_eq!(json["process_date"], "2025-01-15");
        assert_eq!(json["overall_status"], "PASS");
        assert!(json["schema_validation"].is_null());
        assert_eq!(json["data_quality"]["overallStatus"], "PASS");
        Ok(())
    }
}
