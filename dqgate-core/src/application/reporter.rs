// dqgate-core/src/application/reporter.rs

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::domain::quality::QualitySummary;
use crate::domain::report::quarantine::{self, QuarantineEntry};
use crate::domain::report::{QualityReport, render_report, run_id};
use crate::domain::schema::{BatchValidationSummary, RejectedRecord};
use crate::error::GateError;
use crate::ports::storage::ArtifactStore;

const JSON: &str = "application/json";
const JSON_LINES: &str = "application/x-ndjson";

/// Turns validation and check results into persisted artifacts.
/// Holds no state besides its store; every save is a single attempt.
#[derive(Debug, Clone)]
pub struct QualityReporter<S: ArtifactStore> {
    store: S,
}

impl<S: ArtifactStore> QualityReporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generate_report(
        &self,
        entity: &str,
        schema_results: Option<BatchValidationSummary>,
        quality_results: Option<QualitySummary>,
        process_date: NaiveDate,
    ) -> QualityReport {
        QualityReport::new(entity, schema_results, quality_results, process_date, Utc::now())
    }

    pub async fn save_report(&self, report: &QualityReport) -> Result<String, GateError> {
        let body = serde_json::to_vec_pretty(report)
            .map_err(|e| GateError::InternalError(format!("cannot serialize report: {}", e)))?;

        let location = self.store.put(&report.storage_key(), body, JSON).await?;
        info!(
            %location,
            entity = %report.entity,
            status = %report.overall_status,
            "Quality report saved"
        );
        Ok(location)
    }

    /// Quarantine rejected records under a fresh run id.
    pub async fn save_bad_records(
        &self,
        records: &[RejectedRecord],
        entity: &str,
        process_date: NaiveDate,
        reason: &str,
    ) -> Result<String, GateError> {
        let run = run_id(entity, process_date, Utc::now());
        self.quarantine(&run, records, entity, process_date, reason)
            .await
    }

    /// Quarantine rejected records, tagging each entry with `run_id`.
    pub async fn quarantine(
        &self,
        run_id: &str,
        records: &[RejectedRecord],
        entity: &str,
        process_date: NaiveDate,
        reason: &str,
    ) -> Result<String, GateError> {
        let now = Utc::now();
        let entries: Vec<QuarantineEntry> = records
            .iter()
            .map(|r| QuarantineEntry::from_rejected(r, run_id, entity, process_date, reason, now))
            .collect();
        let body = quarantine::to_json_lines(&entries)
            .map_err(|e| GateError::InternalError(format!("cannot serialize quarantine: {}", e)))?;

        let key = quarantine::quarantine_key(entity, reason, now);
        let location = self.store.put(&key, body, JSON_LINES).await?;
        info!(%location, entity, count = entries.len(), reason, "Quarantined records");
        Ok(location)
    }

    pub fn print_report(&self, report: &QualityReport) {
        println!("{}", render_report(report));
    }
}
