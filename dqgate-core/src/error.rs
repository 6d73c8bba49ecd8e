// dqgate-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{InfrastructureError, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    // --- DOMAIN ERRORS (schema definitions, thresholds, table conversion) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, config parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- PERSISTENCE ERRORS (the gate could not record its own verdict) ---
    #[error(transparent)]
    Persistence(#[from] StorageError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl GateError {
    /// True when the failure happened while writing a report or a quarantine batch.
    pub fn is_persistence(&self) -> bool {
        matches!(self, GateError::Persistence(_))
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        GateError::Infrastructure(InfrastructureError::Io(err))
    }
}
