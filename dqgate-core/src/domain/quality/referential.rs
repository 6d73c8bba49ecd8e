// dqgate-core/src/domain/quality/referential.rs

use std::collections::{BTreeSet, HashSet};

use datafusion::arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::domain::quality::result::CheckOutcome;
use crate::domain::quality::table;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "referential_integrity";
pub const MAX_ORPHAN_SAMPLES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferentialDetails {
    pub column: String,
    pub total_unique_values: usize,
    pub reference_set_size: usize,
    pub orphaned_count: usize,
    pub sample_orphans: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Values are compared by their string form, so numeric keys match a
/// reference set of their decimal renderings.
pub fn evaluate(
    batch: &RecordBatch,
    column: &str,
    reference_set: &HashSet<String>,
) -> CheckOutcome<ReferentialDetails> {
    let mut details = ReferentialDetails {
        column: column.to_string(),
        total_unique_values: 0,
        reference_set_size: reference_set.len(),
        orphaned_count: 0,
        sample_orphans: Vec::new(),
        reason: None,
    };

    let values = match table::column(batch, column).map(table::to_strings) {
        None => {
            details.reason = Some(format!("Column {} not found", column));
            return CheckOutcome {
                status: CheckStatus::Fail,
                details,
            };
        }
        Some(Err(e)) => {
            details.reason = Some(format!("Unable to read column {}: {}", column, e));
            return CheckOutcome {
                status: CheckStatus::Fail,
                details,
            };
        }
        Some(Ok(values)) => values,
    };

    let distinct: BTreeSet<String> = values.into_iter().flatten().collect();
    let orphans: Vec<&String> = distinct
        .iter()
        .filter(|v| !reference_set.contains(*v))
        .collect();

    details.total_unique_values = distinct.len();
    details.orphaned_count = orphans.len();
    details.sample_orphans = orphans
        .into_iter()
        .take(MAX_ORPHAN_SAMPLES)
        .cloned()
        .collect();

    let status = if details.orphaned_count > 0 {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    CheckOutcome { status, details }
}
