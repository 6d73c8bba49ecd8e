// dqgate-core/src/domain/report/mod.rs

pub mod quarantine;
#[allow(clippy::module_inception)]
pub mod report;
pub mod render;

pub use quarantine::{QuarantineEntry, quarantine_key};
pub use render::render_report;
pub use report::{QualityReport, key_segment, run_id};
