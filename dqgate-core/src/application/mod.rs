// dqgate-core/src/application/mod.rs

pub mod gate;
pub mod reporter;

// --- RE-EXPORTS (FACADE PATTERN) ---
pub use gate::{EntityBatch, GateDecision, GateOutcome, QualityGate};
pub use reporter::QualityReporter;
