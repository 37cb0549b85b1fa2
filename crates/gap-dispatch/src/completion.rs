use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use gap_core::errors::GapError;
use gap_core::Engine;
use serde::{Deserialize, Serialize};

use crate::canonical::{from_json_slice, write_canonical_json};

/// Status record written into a sample directory after a successful engine run.
pub const COMPLETE_MARKER: &str = ".gap-complete.json";

/// What counts as "already processed" for a sample directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// The sample directory must hold a completion marker.
    #[default]
    Marker,
    /// Any directory entry named after the sample counts.
    Directory,
}

/// Returns true iff `output_subdirectory` has an immediate child named exactly
/// `sample_prefix`. A missing or unreadable directory yields false.
pub fn is_done(sample_prefix: &str, output_subdirectory: &Path) -> bool {
    let Ok(entries) = fs::read_dir(output_subdirectory) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_str() == Some(sample_prefix))
}

/// Contents of [`COMPLETE_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Engine that produced the directory.
    pub engine: Engine,
    /// Kmer value the engine ran with.
    pub kmer: String,
    /// Sample prefix.
    pub sample: String,
    /// Forward read file.
    pub forward: String,
    /// Reverse read file, if paired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<String>,
    /// RFC 3339 completion time.
    pub completed_at: String,
}

impl CompletionRecord {
    /// Record stamped with the current time.
    pub fn now(
        engine: Engine,
        kmer: impl Into<String>,
        sample: impl Into<String>,
        forward: impl Into<String>,
        reverse: Option<String>,
    ) -> Self {
        Self {
            engine,
            kmer: kmer.into(),
            sample: sample.into(),
            forward: forward.into(),
            reverse,
            completed_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Writes the marker through a temporary file and a rename.
pub fn write_marker(sample_dir: &Path, record: &CompletionRecord) -> Result<(), GapError> {
    write_canonical_json(&sample_dir.join(COMPLETE_MARKER), record)
}

/// Reads the marker of a sample directory; `None` when absent or unreadable.
pub fn read_marker(sample_dir: &Path) -> Option<CompletionRecord> {
    let bytes = fs::read(sample_dir.join(COMPLETE_MARKER)).ok()?;
    from_json_slice(&bytes).ok()
}

/// Completion checks plus an in-process claim set over sample directories.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    policy: CompletionPolicy,
    in_flight: Mutex<HashSet<PathBuf>>,
}

impl CompletionTracker {
    /// Tracker applying `policy`.
    pub fn new(policy: CompletionPolicy) -> Self {
        Self {
            policy,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Active policy.
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Whether `sample_prefix` is already processed below `engine_dir`.
    pub fn is_complete(&self, sample_prefix: &str, engine_dir: &Path) -> bool {
        if !is_done(sample_prefix, engine_dir) {
            return false;
        }
        match self.policy {
            CompletionPolicy::Directory => true,
            CompletionPolicy::Marker => read_marker(&engine_dir.join(sample_prefix))
                .is_some_and(|record| record.sample == sample_prefix),
        }
    }

    /// True when a sample directory exists but does not count as complete.
    pub fn is_stale(&self, sample_prefix: &str, engine_dir: &Path) -> bool {
        is_done(sample_prefix, engine_dir) && !self.is_complete(sample_prefix, engine_dir)
    }

    /// Reserves `sample_dir` for the caller. Returns `None` while another
    /// worker holds it.
    pub fn claim(&self, sample_dir: &Path) -> Option<Claim<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !in_flight.insert(sample_dir.to_path_buf()) {
            return None;
        }
        Some(Claim {
            tracker: self,
            path: sample_dir.to_path_buf(),
        })
    }
}

/// Held while a worker owns a sample directory; released on drop.
#[derive(Debug)]
pub struct Claim<'a> {
    tracker: &'a CompletionTracker,
    path: PathBuf,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .tracker
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.remove(&self.path);
    }
}
