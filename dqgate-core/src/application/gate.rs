// dqgate-core/src/application/gate.rs

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::StreamExt;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::application::reporter::QualityReporter;
use crate::domain::quality::{QualityChecker, RowCountExpectation};
use crate::domain::report::QualityReport;
use crate::domain::schema::{Record, SchemaValidator};
use crate::domain::status::CheckStatus;
use crate::error::GateError;
use crate::infrastructure::adapters::{LocalArtifactStore, flatten_nested, records_to_table};
use crate::infrastructure::config::{EntityRules, GateConfig};
use crate::ports::storage::ArtifactStore;

pub const SCHEMA_QUARANTINE_REASON: &str = "schema_validation";

/// One entity's records for one processing date.
#[derive(Debug, Clone)]
pub struct EntityBatch {
    pub entity: String,
    pub process_date: NaiveDate,
    pub records: Vec<Record>,
    /// Row count of the previous run, for drift detection.
    pub previous_row_count: Option<u64>,
    /// Named reference sets for referential integrity checks.
    pub references: HashMap<String, HashSet<String>>,
}

impl EntityBatch {
    pub fn new(entity: impl Into<String>, process_date: NaiveDate, records: Vec<Record>) -> Self {
        Self {
            entity: entity.into(),
            process_date,
            records,
            previous_row_count: None,
            references: HashMap::new(),
        }
    }

    pub fn with_previous_row_count(mut self, count: u64) -> Self {
        self.previous_row_count = Some(count);
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>, values: HashSet<String>) -> Self {
        self.references.insert(name.into(), values);
        self
    }
}

/// What a downstream stage should do with the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Proceed,
    ProceedWithWarnings,
    Halt,
}

impl GateDecision {
    pub fn should_proceed(&self) -> bool {
        !matches!(self, Self::Halt)
    }
}

impl From<CheckStatus> for GateDecision {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Pass => Self::Proceed,
            CheckStatus::Warn => Self::ProceedWithWarnings,
            CheckStatus::Fail => Self::Halt,
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Proceed => "proceed",
            Self::ProceedWithWarnings => "proceed with warnings",
            Self::Halt => "halt",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub report: QualityReport,
    pub report_location: String,
    pub quarantine_location: Option<String>,
    pub decision: GateDecision,
}

/// Validates, checks, reports and quarantines entity batches.
///
/// The schema table is shared read-only between runs. Each run gets its own
/// [`QualityChecker`], so batches for different entities never share state.
pub struct QualityGate<S: ArtifactStore> {
    validator: Arc<SchemaValidator>,
    reporter: QualityReporter<S>,
    config: GateConfig,
}

impl QualityGate<LocalArtifactStore> {
    /// Gate writing to `config.output_dir`, with schemas from `config.schemas_dir`
    /// or the built-in set.
    pub fn from_config(config: GateConfig) -> Result<Self, GateError> {
        let validator = match &config.schemas_dir {
            Some(dir) => SchemaValidator::from_dir(dir)?,
            None => SchemaValidator::builtin()?,
        };
        let store = LocalArtifactStore::new(&config.output_dir);
        Self::new(validator, store, config)
    }
}

impl<S: ArtifactStore> QualityGate<S> {
    pub fn new(validator: SchemaValidator, store: S, config: GateConfig) -> Result<Self, GateError> {
        config.thresholds.ensure_valid()?;
        Ok(Self {
            validator: Arc::new(validator),
            reporter: QualityReporter::new(store),
            config,
        })
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    pub fn reporter(&self) -> &QualityReporter<S> {
        &self.reporter
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run one batch end to end. Data problems, including records that cannot
    /// be laid out as a table, land in the report; only invalid thresholds,
    /// persistence and internal failures are returned as errors.
    #[instrument(skip_all, fields(entity = %batch.entity, process_date = %batch.process_date))]
    pub async fn evaluate(&self, batch: EntityBatch) -> Result<GateOutcome, GateError> {
        let rules = self
            .config
            .rules_for(&batch.entity)
            .cloned()
            .unwrap_or_default();

        let partition = self.validator.partition_batch(&batch.records, &batch.entity);

        let mut checker = QualityChecker::new(self.config.thresholds)?;
        match records_to_table(&partition.valid) {
            Ok(table) => self.run_checks(&mut checker, &table, &rules, &batch),
            Err(e) => {
                warn!(error = %e, "Valid records do not form one table, flattening nested values");
                let fallback = records_to_table(&flatten_nested(&partition.valid));
                checker.record_conversion_failure(partition.valid.len(), &e.to_string(), fallback.is_ok());
                if let Ok(table) = fallback {
                    self.run_checks(&mut checker, &table, &rules, &batch);
                }
            }
        }

        let report = self.reporter.generate_report(
            &batch.entity,
            Some(partition.summary),
            Some(checker.get_summary()),
            batch.process_date,
        );
        let report_location = self.reporter.save_report(&report).await?;

        let quarantine_location = if rules.quarantine_invalid && !partition.rejected.is_empty() {
            let location = self
                .reporter
                .quarantine(
                    &report.report_id,
                    &partition.rejected,
                    &batch.entity,
                    batch.process_date,
                    SCHEMA_QUARANTINE_REASON,
                )
                .await?;
            Some(location)
        } else {
            None
        };

        let decision = GateDecision::from(report.overall_status);
        info!(
            status = %report.overall_status,
            %decision,
            report = %report_location,
            "{} Gate evaluated",
            report.overall_status.icon()
        );

        Ok(GateOutcome {
            report,
            report_location,
            quarantine_location,
            decision,
        })
    }

    /// Run many batches concurrently. One batch failing does not stop the
    /// others; results come back in input order.
    pub async fn evaluate_all(
        &self,
        batches: Vec<EntityBatch>,
    ) -> Vec<(String, Result<GateOutcome, GateError>)> {
        let concurrency = self.config.concurrency.max(1);

        let futures = batches.into_iter().enumerate().map(|(i, batch)| async move {
            let entity = batch.entity.clone();
            let res = self.evaluate(batch).await;
            if let Err(e) = &res {
                error!(entity = %entity, error = %e, "Gate run failed");
            }
            (i, entity, res)
        });

        let mut results: Vec<_> = futures::stream::iter(futures)
            .buffer_unordered(concurrency)
            .collect()
            .await;
        results.sort_by_key(|(i, _, _)| *i);
        results
            .into_iter()
            .map(|(_, entity, res)| (entity, res))
            .collect()
    }

    fn run_checks(
        &self,
        checker: &mut QualityChecker,
        table: &datafusion::arrow::record_batch::RecordBatch,
        rules: &EntityRules,
        batch: &EntityBatch,
    ) {
        if !rules.required_columns.is_empty() {
            checker.check_nulls(table, &rules.required_columns);
        }
        if !rules.key_columns.is_empty() {
            checker.check_duplicates(table, &rules.key_columns);
        }
        if !rules.ranges.is_empty() {
            checker.check_ranges(table, &rules.ranges);
        }

        let expectation = RowCountExpectation {
            expected_min: rules.expected_min_rows,
            expected_max: rules.expected_max_rows,
            previous_count: batch.previous_row_count,
            variance_threshold_pct: rules.variance_threshold_pct,
        };
        checker.check_row_count(table, expectation);

        if let Some(column) = &rules.timestamp_column {
            checker.check_freshness(table, column);
        }

        let empty = HashSet::new();
        for (column, reference) in &rules.references {
            let set = batch.references.get(reference).unwrap_or_else(|| {
                warn!(column = %column, reference = %reference, "Reference set not supplied");
                &empty
            });
            checker.check_referential_integrity(table, column, set);
        }
    }
}
