use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use gap_core::errors::{io_error, ErrorInfo, GapError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::sample::{reverse_name_for, Sample, FORWARD_MARKER, REVERSE_MARKER};

/// File name patterns recognised as sequencing reads.
pub const READ_FILE_PATTERNS: [&str; 4] = ["*.fastq", "*.fq", "*.fastq.gz", "*.fq.gz"];

/// Batch-wide pairing classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadLayout {
    /// Every forward file has a mate.
    Paired,
    /// At least one forward file lacks a mate.
    Single,
}

/// How read files without `_1`/`_2` markers are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// Unmarked files are single-end forward reads; orphan mates are ignored.
    #[default]
    Permissive,
    /// Unmarked files and orphan reverse files fail discovery.
    Strict,
}

/// Options controlling read-set discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOpts {
    /// Naming convention enforcement.
    pub naming: NamingPolicy,
    /// Seed for the shuffle; `None` draws from system entropy.
    pub shuffle_seed: Option<u64>,
}

/// Forward file to optional reverse file, in shuffled processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadSetMap {
    entries: Vec<(String, Option<String>)>,
}

impl ReadSetMap {
    /// Number of forward files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no forward file was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mate registered for a forward file; `None` when the key is unknown.
    pub fn get(&self, forward: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(key, _)| key == forward)
            .map(|(_, reverse)| reverse.as_deref())
    }

    /// Iterates entries in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(forward, reverse)| (forward.as_str(), reverse.as_deref()))
    }

    /// Samples in processing order.
    pub fn samples(&self) -> Vec<Sample> {
        self.entries
            .iter()
            .map(|(forward, reverse)| Sample::new(forward.clone(), reverse.clone()))
            .collect()
    }

    /// Forward file names in processing order.
    pub fn forward_files(&self) -> Vec<&str> {
        self.entries.iter().map(|(forward, _)| forward.as_str()).collect()
    }
}

impl<F: Into<String>> FromIterator<(F, Option<String>)> for ReadSetMap {
    fn from_iter<I: IntoIterator<Item = (F, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(forward, reverse)| (forward.into(), reverse))
                .collect(),
        }
    }
}

/// Classification of an input directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadSetDiscovery {
    /// Batch-wide pairing classification.
    pub layout: ReadLayout,
    /// Forward to reverse mapping.
    pub reads: ReadSetMap,
}

fn read_file_matcher() -> Result<GlobSet, GapError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in READ_FILE_PATTERNS {
        let glob = Glob::new(pattern).map_err(|err| {
            GapError::Discovery(ErrorInfo::new("gap_reads.read_pattern", err.to_string()))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| GapError::Discovery(ErrorInfo::new("gap_reads.read_pattern", err.to_string())))
}

/// Scans `input_dir` and classifies its read files.
pub fn discover_read_sets(input_dir: &Path, opts: &DiscoverOpts) -> Result<ReadSetDiscovery, GapError> {
    let entries = fs::read_dir(input_dir).map_err(|err| io_error("gap_reads.read_dir", input_dir, err))?;
    let mut names = Vec::new();
    let mut any_entry = false;
    for entry in entries {
        let entry = entry.map_err(|err| io_error("gap_reads.read_dir", input_dir, err))?;
        any_entry = true;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    if !any_entry {
        return Err(GapError::Discovery(
            ErrorInfo::new("gap_reads.empty_directory", "no files present in the input directory")
                .with_context("path", input_dir.display().to_string()),
        ));
    }
    classify(&names, opts).map_err(|err| match err {
        GapError::Discovery(info) => {
            GapError::Discovery(info.with_context("path", input_dir.display().to_string()))
        }
        other => other,
    })
}

/// Classifies a list of file names into a [`ReadSetDiscovery`].
pub fn classify(file_names: &[String], opts: &DiscoverOpts) -> Result<ReadSetDiscovery, GapError> {
    if file_names.is_empty() {
        return Err(GapError::Discovery(ErrorInfo::new(
            "gap_reads.empty_directory",
            "no files present in the input directory",
        )));
    }
    let matcher = read_file_matcher()?;
    let mut reads: Vec<String> = file_names
        .iter()
        .filter(|name| matcher.is_match(name.as_str()))
        .cloned()
        .collect();
    if reads.is_empty() {
        return Err(GapError::Discovery(
            ErrorInfo::new("gap_reads.no_read_files", "no fastq/fq read files found")
                .with_hint("read files must end in .fastq, .fq, .fastq.gz or .fq.gz"),
        ));
    }
    reads.sort();
    reads.dedup();

    let available: BTreeSet<&str> = reads.iter().map(String::as_str).collect();
    let mut forward: Vec<String> = reads
        .iter()
        .filter(|name| name.contains(FORWARD_MARKER) || !name.contains(REVERSE_MARKER))
        .cloned()
        .collect();

    if opts.naming == NamingPolicy::Strict {
        enforce_naming(&reads, &forward, &available)?;
    }

    let mut rng = match opts.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    forward.shuffle(&mut rng);

    let entries: Vec<(String, Option<String>)> = forward
        .into_iter()
        .map(|name| {
            let mate = reverse_name_for(&name).filter(|mate| available.contains(mate.as_str()));
            (name, mate)
        })
        .collect();

    let layout = if entries.iter().all(|(_, mate)| mate.is_some()) {
        ReadLayout::Paired
    } else {
        ReadLayout::Single
    };
    log::debug!(
        "classified {} forward read files as {:?}",
        entries.len(),
        layout
    );
    Ok(ReadSetDiscovery {
        layout,
        reads: ReadSetMap { entries },
    })
}

fn enforce_naming(
    reads: &[String],
    forward: &[String],
    available: &BTreeSet<&str>,
) -> Result<(), GapError> {
    let unmarked: Vec<&str> = reads
        .iter()
        .filter(|name| !name.contains(FORWARD_MARKER) && !name.contains(REVERSE_MARKER))
        .map(String::as_str)
        .collect();
    let mates: BTreeSet<String> = forward
        .iter()
        .filter_map(|name| reverse_name_for(name))
        .filter(|mate| available.contains(mate.as_str()))
        .collect();
    let orphans: Vec<&str> = reads
        .iter()
        .filter(|name| !forward.contains(*name) && !mates.contains(name.as_str()))
        .map(String::as_str)
        .collect();
    if unmarked.is_empty() && orphans.is_empty() {
        return Ok(());
    }
    let mut info = ErrorInfo::new(
        "gap_reads.naming_convention",
        "read files do not follow the <prefix>_1/<prefix>_2 naming convention",
    )
    .with_hint("rename files or use the permissive naming policy");
    if !unmarked.is_empty() {
        info = info.with_context("unmarked", unmarked.join(","));
    }
    if !orphans.is_empty() {
        info = info.with_context("orphan_reverse", orphans.join(","));
    }
    Err(GapError::Discovery(info))
}
