pub mod doctor;
pub mod run;

use std::path::Path;

use gap_core::GapError;
use gap_pipeline::PipelineConfig;

/// Configuration from `path`, or the defaults when none is given.
pub fn base_config(path: Option<&Path>) -> Result<PipelineConfig, GapError> {
    match path {
        Some(path) => PipelineConfig::load(path),
        None => Ok(PipelineConfig::default()),
    }
}
