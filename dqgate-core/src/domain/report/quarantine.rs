// dqgate-core/src/domain/report/quarantine.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::report::report::{date_partition, key_segment};
use crate::domain::schema::{Record, RejectedRecord};

pub const QUARANTINE_PREFIX: &str = "quarantine";

/// One line of a quarantine file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantineEntry {
    pub run_id: String,
    pub entity: String,
    pub process_date: NaiveDate,
    pub reason: String,
    pub quarantined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_index: Option<usize>,
    #[serde(default)]
    pub errors: Vec<String>,
    pub record: Record,
}

impl QuarantineEntry {
    pub fn from_rejected(
        rejected: &RejectedRecord,
        run_id: &str,
        entity: &str,
        process_date: NaiveDate,
        reason: &str,
        quarantined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            entity: entity.to_string(),
            process_date,
            reason: reason.to_string(),
            quarantined_at,
            record_index: rejected.record_index,
            errors: rejected.errors.clone(),
            record: rejected.record.clone(),
        }
    }
}

/// Partitioned by quarantine time; the process date travels inside each entry.
pub fn quarantine_key(entity: &str, reason: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}/bad_records_{}_{}.jsonl",
        QUARANTINE_PREFIX,
        key_segment(entity),
        date_partition(at),
        key_segment(reason),
        at.format("%H%M%S%3f")
    )
}

/// Newline-delimited JSON, one entry per line.
pub fn to_json_lines(entries: &[QuarantineEntry]) -> Result<Vec<u8>, serde_json::Error> {
    let mut body = Vec::new();
    for entry in entries {
        serde_json::to_writer(&mut body, entry)?;
        body.push(b'\n');
    }
    Ok(body)
}
