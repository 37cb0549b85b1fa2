use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use gap_core::errors::{io_error, ErrorInfo, GapError};
use serde::{Deserialize, Serialize};

use crate::sample::manifest_key;

/// Default location of the pre-trim manifest, relative to the working directory.
pub const PRE_TRIM_MANIFEST_PATH: &str = "tmp/pre_trim_manifest.tsv";

/// Read length per read-file identifier (file name up to its first `.`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    lengths: BTreeMap<String, u32>,
}

impl Manifest {
    /// Parses `<identifier>\t<length>` rows. Extra columns are ignored.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, GapError> {
        let mut rows = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        let mut lengths = BTreeMap::new();
        for record in rows.records() {
            let record = record.map_err(|err| {
                GapError::Parse(
                    ErrorInfo::new("gap_reads.manifest_row", err.to_string())
                        .with_context("source", source),
                )
            })?;
            let line = record
                .position()
                .map(|pos| pos.line().to_string())
                .unwrap_or_default();
            let identifier = record.get(0).unwrap_or_default().trim();
            let Some(length) = record.get(1).map(str::trim).filter(|field| !field.is_empty()) else {
                return Err(GapError::Parse(
                    ErrorInfo::new("gap_reads.manifest_row", "manifest row lacks a length field")
                        .with_context("source", source)
                        .with_context("line", line)
                        .with_context("identifier", identifier),
                ));
            };
            let length: u32 = length.parse().map_err(|_| {
                GapError::Parse(
                    ErrorInfo::new("gap_reads.manifest_length", "read length is not an integer")
                        .with_context("source", source)
                        .with_context("line", line.clone())
                        .with_context("value", length),
                )
            })?;
            lengths.insert(identifier.to_string(), length);
        }
        Ok(Self { lengths })
    }

    /// Loads a manifest file. A missing file is an environment error.
    pub fn load(path: &Path) -> Result<Self, GapError> {
        let file = File::open(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                GapError::Environment(
                    ErrorInfo::new("gap_reads.manifest_missing", "manifest file not found")
                        .with_context("path", path.display().to_string()),
                )
            } else {
                io_error("gap_reads.manifest_open", path, err)
            }
        })?;
        let manifest = Self::from_reader(file, &path.display().to_string())?;
        log::debug!("loaded {} manifest rows from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    /// Length recorded for an identifier.
    pub fn get(&self, identifier: &str) -> Option<u32> {
        self.lengths.get(identifier).copied()
    }

    /// Length recorded for a read file, looked up by its manifest key.
    pub fn length_of(&self, file_name: &str) -> Option<u32> {
        self.get(manifest_key(file_name))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// True when the manifest has no rows.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self {
            lengths: iter.into_iter().map(|(key, len)| (key.into(), len)).collect(),
        }
    }
}

/// Manifests available to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifests {
    /// Read lengths before trimming; drives sampling and MaSuRCA statistics.
    pub pre_trim: Manifest,
    /// Read lengths after trimming, when the trimming stage has produced them.
    pub post_trim: Option<Manifest>,
}

/// Loads the pre-trim manifest and, when a path is configured, the post-trim one.
pub fn load_manifests(pre_trim: &Path, post_trim: Option<&Path>) -> Result<Manifests, GapError> {
    let pre_trim = Manifest::load(pre_trim)?;
    let post_trim = post_trim.map(Manifest::load).transpose()?;
    Ok(Manifests {
        pre_trim,
        post_trim,
    })
}
