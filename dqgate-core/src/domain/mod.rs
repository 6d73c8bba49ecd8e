// dqgate-core/src/domain/mod.rs

pub mod error;
pub mod quality;
pub mod report;
pub mod schema;
pub mod status;

// Handy re-exports to simplify imports elsewhere
pub use error::DomainError;
pub use status::CheckStatus;

/// Percentages are reported with two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
