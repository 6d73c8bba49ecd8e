// dqgate-core/src/domain/quality/freshness.rs

use chrono::{DateTime, Utc};
use datafusion::arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::domain::quality::result::CheckOutcome;
use crate::domain::quality::table;
use crate::domain::quality::thresholds::ThresholdConfig;
use crate::domain::round2;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "freshness_check";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreshnessDetails {
    pub column: String,
    pub latest_timestamp: Option<DateTime<Utc>>,
    pub hours_since_latest: Option<f64>,
    pub threshold_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Staleness only ever warns. A column that cannot be read at all fails.
pub fn evaluate(
    batch: &RecordBatch,
    timestamp_column: &str,
    thresholds: &ThresholdConfig,
    now: DateTime<Utc>,
) -> CheckOutcome<FreshnessDetails> {
    let mut details = FreshnessDetails {
        column: timestamp_column.to_string(),
        latest_timestamp: None,
        hours_since_latest: None,
        threshold_hours: thresholds.freshness_hours_max,
        reason: None,
        error: None,
    };
    let fail = |details| CheckOutcome {
        status: CheckStatus::Fail,
        details,
    };

    let Some(array) = table::column(batch, timestamp_column) else {
        details.reason = Some(format!("Column {} not found", timestamp_column));
        return fail(details);
    };

    let timestamps = match table::to_timestamps(array) {
        Ok(ts) => ts,
        Err(e) => {
            details.error = Some(e);
            return fail(details);
        }
    };

    let Some(latest) = timestamps.into_iter().flatten().max() else {
        details.reason = Some("No parseable timestamps".into());
        return fail(details);
    };

    let hours_old = (now - latest).num_milliseconds() as f64 / 3_600_000.0;
    details.latest_timestamp = Some(latest);
    details.hours_since_latest = Some(round2(hours_old));

    let status = if hours_old > thresholds.freshness_hours_max {
        CheckStatus::Warn
    } else {
        CheckStatus::Pass
    };
    CheckOutcome { status, details }
}
