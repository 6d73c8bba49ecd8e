// dqgate-core/src/domain/quality/mod.rs

pub mod checker;
pub mod conversion;
pub mod duplicates;
pub mod freshness;
pub mod nulls;
pub mod ranges;
pub mod referential;
pub mod result;
pub mod row_count;
pub mod table;
pub mod thresholds;

pub use checker::QualityChecker;
pub use ranges::RangeRule;
pub use result::{CheckDetails, CheckOutcome, CheckResult, QualitySummary};
pub use row_count::RowCountExpectation;
pub use thresholds::ThresholdConfig;
