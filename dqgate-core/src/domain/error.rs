// dqgate-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema Error: {0}")]
    #[diagnostic(
        code(dqgate::domain::schema),
        help("Check the entity definition (field names, regex patterns, duplicate entities).")
    )]
    SchemaError(String),

    #[error("Invalid thresholds: {0}")]
    #[diagnostic(
        code(dqgate::domain::thresholds),
        help("Percentages must be within [0, 100] and every threshold must be non-negative.")
    )]
    InvalidThresholds(String),

    #[error("Cannot build a table from records: {0}")]
    #[diagnostic(code(dqgate::domain::table))]
    TableConversion(String),
}
