use serde::{Deserialize, Serialize};

/// Marker identifying forward reads in a file name.
pub const FORWARD_MARKER: &str = "_1";
/// Marker identifying reverse reads in a file name.
pub const REVERSE_MARKER: &str = "_2";

/// Manifest identifier for a read file: the name up to its first `.`.
pub fn manifest_key(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Sample prefix for a forward read file.
///
/// `CGT2049_1.fq.gz` becomes `CGT2049`. Names without a trailing forward
/// marker keep their whole manifest key.
pub fn sample_prefix(forward_file: &str) -> String {
    let key = manifest_key(forward_file);
    key.strip_suffix(FORWARD_MARKER).unwrap_or(key).to_string()
}

/// Reverse file name expected for a forward file, replacing the last `_1` with `_2`.
pub fn reverse_name_for(forward_file: &str) -> Option<String> {
    let at = forward_file.rfind(FORWARD_MARKER)?;
    let mut name = String::with_capacity(forward_file.len());
    name.push_str(&forward_file[..at]);
    name.push_str(REVERSE_MARKER);
    name.push_str(&forward_file[at + FORWARD_MARKER.len()..]);
    Some(name)
}

/// One sequencing unit: a forward read file and its optional mate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Output directory name shared by every engine.
    pub prefix: String,
    /// Forward read file name, relative to the input directory.
    pub forward: String,
    /// Reverse read file name; `None` for single-end samples.
    pub reverse: Option<String>,
}

impl Sample {
    /// Builds a sample from a read-set map entry.
    pub fn new(forward: impl Into<String>, reverse: Option<String>) -> Self {
        let forward = forward.into();
        Self {
            prefix: sample_prefix(&forward),
            forward,
            reverse,
        }
    }

    /// True when both mates are present.
    pub fn is_paired(&self) -> bool {
        self.reverse.is_some()
    }

    /// Manifest identifier of the forward file.
    pub fn forward_key(&self) -> &str {
        manifest_key(&self.forward)
    }

    /// Manifest identifier of the reverse file.
    pub fn reverse_key(&self) -> Option<&str> {
        self.reverse.as_deref().map(manifest_key)
    }
}
