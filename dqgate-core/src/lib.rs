// dqgate-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Storage contract the reporter writes through.
pub mod ports;

// 2. Domain (business core)
// Status model, schemas, statistical checks, report value types.
// Depends on nothing else in the crate (no infra, no app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Local + in-memory stores, YAML loaders, record -> Arrow conversion.
pub mod infrastructure;

// 4. Application (Use Cases)
// Reporter and the per-entity gate.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use application::{EntityBatch, GateDecision, GateOutcome, QualityGate, QualityReporter};
pub use domain::quality::{QualityChecker, ThresholdConfig};
pub use domain::schema::SchemaValidator;
pub use domain::status::CheckStatus;
pub use error::GateError;
