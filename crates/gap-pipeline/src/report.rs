use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use gap_core::errors::GapError;
use gap_dispatch::{write_canonical_json, AssemblyReport};
use gap_reads::ReadLayout;
use serde::{Deserialize, Serialize};

/// File name of the run report inside the output root.
pub const REPORT_FILE: &str = "assembly_report.json";

/// Where a report came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Canonical hash of the resolved configuration.
    pub config_hash: String,
    /// RFC 3339 timestamp of report creation.
    pub created_at: String,
    /// Versions of the crates involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Provenance stamped with the current time.
    pub fn new(config_hash: String) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            "gap-pipeline".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Self {
            config_hash,
            created_at: Utc::now().to_rfc3339(),
            tool_versions,
        }
    }
}

/// Outcome of the downstream quality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum QualityOutcome {
    /// Disabled by configuration.
    Disabled,
    /// Completed; the report lives in `report_dir`.
    Completed {
        /// QUAST output directory.
        report_dir: PathBuf,
    },
    /// Attempted and failed; the run itself is unaffected.
    Failed {
        /// Error description.
        reason: String,
    },
}

/// Report written to [`REPORT_FILE`] at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Batch-wide pairing classification.
    pub layout: ReadLayout,
    /// Forward read files discovered.
    pub discovered: usize,
    /// Orchestrator outcomes and budget accounting.
    pub assembly: AssemblyReport,
    /// Downstream quality check result.
    pub quality: QualityOutcome,
    /// Provenance metadata.
    pub provenance: RunProvenance,
}

impl PipelineReport {
    /// Writes the report as canonical JSON below `output_root`.
    pub fn write(&self, output_root: &Path) -> Result<PathBuf, GapError> {
        let path = output_root.join(REPORT_FILE);
        write_canonical_json(&path, self)?;
        Ok(path)
    }
}
