// dqgate-core/src/domain/quality/thresholds.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;

/// Numeric limits separating PASS/WARN/FAIL for one run. Read-only once a checker owns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ThresholdConfig {
    #[validate(range(min = 0.0, max = 100.0))]
    pub null_percentage_max: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub duplicate_percentage_max: f64,

    pub min_row_count: u64,

    #[validate(range(min = 0.0))]
    pub freshness_hours_max: f64,

    /// Default tolerance for row-count drift against the previous run.
    #[validate(range(min = 0.0))]
    pub row_count_variance_pct: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            null_percentage_max: 5.0,
            duplicate_percentage_max: 1.0,
            min_row_count: 100,
            freshness_hours_max: 6.0,
            row_count_variance_pct: 50.0,
        }
    }
}

impl ThresholdConfig {
    pub fn new(
        null_percentage_max: f64,
        duplicate_percentage_max: f64,
        min_row_count: u64,
        freshness_hours_max: f64,
    ) -> Result<Self, DomainError> {
        let config = Self {
            null_percentage_max,
            duplicate_percentage_max,
            min_row_count,
            freshness_hours_max,
            ..Default::default()
        };
        config.ensure_valid()?;
        Ok(config)
    }

    /// Reject out-of-range or non-finite values.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        let values = [
            self.null_percentage_max,
            self.duplicate_percentage_max,
            self.freshness_hours_max,
            self.row_count_variance_pct,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::InvalidThresholds(
                "thresholds must be finite numbers".into(),
            ));
        }
        self.validate()
            .map_err(|e| DomainError::InvalidThresholds(e.to_string()))
    }
}
