use std::fs;

use gap_core::GapError;
use gap_reads::{load_manifests, Manifest};

#[test]
fn parses_tab_separated_rows() {
    let data = "A_1\t150\nA_2\t160\nB_1\t100\textra\n";
    let manifest = Manifest::from_reader(data.as_bytes(), "inline").expect("parse");
    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest.get("A_1"), Some(150));
    assert_eq!(manifest.length_of("A_2.fq.gz"), Some(160));
    assert_eq!(manifest.get("B_1"), Some(100));
    assert_eq!(manifest.get("C_1"), None);
}

#[test]
fn row_without_length_is_parse_error() {
    let data = "A_1\t150\nB_1\n";
    let err = Manifest::from_reader(data.as_bytes(), "inline").unwrap_err();
    assert!(matches!(err, GapError::Parse(_)));
    assert_eq!(err.info().context.get("line").map(String::as_str), Some("2"));
    assert_eq!(err.info().context.get("identifier").map(String::as_str), Some("B_1"));
}

#[test]
fn non_integer_length_is_parse_error() {
    let err = Manifest::from_reader("A_1\tlong\n".as_bytes(), "inline").unwrap_err();
    assert_eq!(err.info().code, "gap_reads.manifest_length");
}

#[test]
fn missing_manifest_file_is_fatal() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let err = load_manifests(&temp.path().join("absent.tsv"), None).unwrap_err();
    assert!(matches!(err, GapError::Environment(_)));
}

#[test]
fn post_trim_manifest_is_optional() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let pre = temp.path().join("pre.tsv");
    let post = temp.path().join("post.tsv");
    fs::write(&pre, "A_1\t150\n").expect("write pre");
    fs::write(&post, "A_1\t120\n").expect("write post");

    let only_pre = load_manifests(&pre, None).expect("load");
    assert!(only_pre.post_trim.is_none());

    let both = load_manifests(&pre, Some(&post)).expect("load");
    assert_eq!(both.pre_trim.get("A_1"), Some(150));
    assert_eq!(both.post_trim.and_then(|m| m.get("A_1")), Some(120));
}
