// dqgate-core/src/domain/quality/conversion.rs

use serde::Serialize;

use crate::domain::quality::result::CheckOutcome;
use crate::domain::status::CheckStatus;

pub const CHECK_NAME: &str = "table_conversion";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionDetails {
    pub records: usize,
    pub error: String,
    /// Whether the remaining checks ran over a text-flattened table.
    pub fallback_used: bool,
}

/// Valid records that cannot be laid out as one table always fail the run.
pub fn evaluate(records: usize, error: &str, fallback_used: bool) -> CheckOutcome<ConversionDetails> {
    CheckOutcome {
        status: CheckStatus::Fail,
        details: ConversionDetails {
            records,
            error: error.to_string(),
            fallback_used,
        },
    }
}
