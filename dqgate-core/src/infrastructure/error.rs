// dqgate-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::io::ErrorKind;
use thiserror::Error;

/// Failure to persist a gate artifact (report or quarantine batch).
#[derive(Error, Debug, Diagnostic)]
pub enum StorageError {
    #[error("Storage unavailable for '{location}': {reason}")]
    #[diagnostic(
        code(dqgate::storage::unavailable),
        help("The target store could not be reached. Retrying is the caller's decision.")
    )]
    Unavailable { location: String, reason: String },

    #[error("Permission denied writing '{0}'")]
    #[diagnostic(
        code(dqgate::storage::permission),
        help("Check write permissions on the output location.")
    )]
    PermissionDenied(String),

    #[error("Unsafe storage key rejected: {0}")]
    #[diagnostic(code(dqgate::storage::unsafe_key))]
    UnsafeKey(String),

    #[error("Storage IO Error on '{location}': {source}")]
    #[diagnostic(code(dqgate::storage::io))]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Classify a raw IO failure for a given location.
    pub fn from_io(location: impl Into<String>, err: std::io::Error) -> Self {
        let location = location.into();
        match err.kind() {
            ErrorKind::PermissionDenied => StorageError::PermissionDenied(location),
            ErrorKind::NotConnected | ErrorKind::ConnectionRefused | ErrorKind::TimedOut => {
                StorageError::Unavailable {
                    location,
                    reason: err.to_string(),
                }
            }
            _ => StorageError::Io {
                location,
                source: err,
            },
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Gate configuration not found at '{0}'")]
    #[diagnostic(code(dqgate::infra::config_missing))]
    ConfigNotFound(String),
}

impl From<anyhow::Error> for InfrastructureError {
    fn from(err: anyhow::Error) -> Self {
        InfrastructureError::ConfigError(format!("{:#}", err))
    }
}
