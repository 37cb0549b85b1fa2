#![deny(missing_docs)]
#![doc = "Configuration and end-to-end driver for the gap assembly pipeline."]

/// YAML backed pipeline configuration.
pub mod config;
/// Stage sequencing from discovery to quality check.
pub mod driver;
/// Run report and provenance.
pub mod report;

pub use config::{ManifestPaths, PipelineConfig};
pub use driver::Pipeline;
pub use report::{PipelineReport, QualityOutcome, RunProvenance, REPORT_FILE};
