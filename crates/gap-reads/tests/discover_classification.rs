use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use gap_core::GapError;
use gap_reads::{
    classify, discover_read_sets, DiscoverOpts, NamingPolicy, ReadLayout,
};
use proptest::prelude::*;

fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"@r\nACGT\n+\nIIII\n").expect("write read file");
    }
}

fn seeded() -> DiscoverOpts {
    DiscoverOpts {
        shuffle_seed: Some(7),
        ..DiscoverOpts::default()
    }
}

#[test]
fn empty_directory_fails_with_reason() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let err = discover_read_sets(temp.path(), &seeded()).unwrap_err();
    assert!(matches!(err, GapError::Discovery(_)));
    assert!(!err.info().message.is_empty());
    assert_eq!(err.info().code, "gap_reads.empty_directory");
}

#[test]
fn directory_without_reads_fails() {
    let temp = tempfile::tempdir().expect("tmp dir");
    touch(temp.path(), &["notes.txt", "S1_1.bam"]);
    let err = discover_read_sets(temp.path(), &seeded()).unwrap_err();
    assert_eq!(err.info().code, "gap_reads.no_read_files");
}

#[test]
fn complete_pairs_are_paired() {
    let temp = tempfile::tempdir().expect("tmp dir");
    touch(
        temp.path(),
        &["S1_1.fq", "S1_2.fq", "S2_1.fastq.gz", "S2_2.fastq.gz", "readme.md"],
    );
    let found = discover_read_sets(temp.path(), &seeded()).expect("discover");
    assert_eq!(found.layout, ReadLayout::Paired);
    assert_eq!(found.reads.len(), 2);
    assert_eq!(found.reads.get("S1_1.fq"), Some(Some("S1_2.fq")));
    assert_eq!(found.reads.get("S2_1.fastq.gz"), Some(Some("S2_2.fastq.gz")));
}

#[test]
fn one_missing_mate_downgrades_whole_batch() {
    let temp = tempfile::tempdir().expect("tmp dir");
    touch(temp.path(), &["S1_1.fq", "S1_2.fq", "S2_1.fq"]);
    let found = discover_read_sets(temp.path(), &seeded()).expect("discover");
    assert_eq!(found.layout, ReadLayout::Single);
    assert_eq!(found.reads.get("S1_1.fq"), Some(Some("S1_2.fq")));
    assert_eq!(found.reads.get("S2_1.fq"), Some(None));
}

#[test]
fn unmarked_files_are_single_end_forward_reads() {
    let temp = tempfile::tempdir().expect("tmp dir");
    touch(temp.path(), &["S1_1.fq", "S1_2.fq", "bulk.fq"]);
    let found = discover_read_sets(temp.path(), &seeded()).expect("discover");
    assert_eq!(found.layout, ReadLayout::Single);
    assert_eq!(found.reads.get("bulk.fq"), Some(None));
    assert_eq!(found.reads.get("S1_2.fq"), None);
}

#[test]
fn strict_naming_rejects_unmarked_and_orphans() {
    let names: Vec<String> = ["S1_1.fq", "S1_2.fq", "bulk.fq", "S9_2.fq"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    let opts = DiscoverOpts {
        naming: NamingPolicy::Strict,
        shuffle_seed: Some(1),
    };
    let err = classify(&names, &opts).unwrap_err();
    assert_eq!(err.info().code, "gap_reads.naming_convention");
    assert_eq!(err.info().context.get("unmarked").map(String::as_str), Some("bulk.fq"));
    assert_eq!(
        err.info().context.get("orphan_reverse").map(String::as_str),
        Some("S9_2.fq")
    );
}

#[test]
fn seeded_shuffle_is_reproducible() {
    let names: Vec<String> = (0..20).map(|i| format!("S{i}_1.fq")).collect();
    let first = classify(&names, &seeded()).expect("classify");
    let second = classify(&names, &seeded()).expect("classify");
    assert_eq!(first.reads.forward_files(), second.reads.forward_files());
}

proptest! {
    #[test]
    fn classification_matches_pair_completeness(
        prefixes in prop::collection::btree_set("[A-Z][A-Za-z0-9]{0,6}", 1..8),
        unpaired in prop::collection::btree_set(0usize..8, 0..3),
        ext in prop::sample::select(vec!["fq", "fastq", "fq.gz"]),
    ) {
        let mut names = Vec::new();
        let mut missing = BTreeSet::new();
        for (index, prefix) in prefixes.iter().enumerate() {
            names.push(format!("{prefix}_1.{ext}"));
            if unpaired.contains(&index) {
                missing.insert(index);
            } else {
                names.push(format!("{prefix}_2.{ext}"));
            }
        }
        let found = classify(&names, &DiscoverOpts::default()).unwrap();
        prop_assert_eq!(found.reads.len(), prefixes.len());
        let expected = if missing.is_empty() { ReadLayout::Paired } else { ReadLayout::Single };
        prop_assert_eq!(found.layout, expected);
    }
}
