use std::fs;

use gap_dispatch::{from_json_slice, stable_hash_string, to_canonical_json_bytes, write_canonical_json};
use serde_json::{json, Value};

#[test]
fn object_keys_are_sorted_at_every_depth() {
    let value = json!({"zeta": 1, "alpha": {"y": [ {"b": 2, "a": 1} ], "x": null}});
    let text = String::from_utf8(to_canonical_json_bytes(&value).expect("encode")).expect("utf8");

    assert!(text.ends_with("}\n"));
    assert!(text.find("\"alpha\"") < text.find("\"zeta\""));
    assert!(text.find("\"x\"") < text.find("\"y\""));
    assert!(text.find("\"a\"") < text.find("\"b\""));
}

#[test]
fn hash_depends_on_content_not_key_order() {
    let first = json!({"engine": "spades", "kmer": "auto"});
    let second = json!({"kmer": "auto", "engine": "spades"});
    let other = json!({"kmer": "55", "engine": "spades"});

    let hash = stable_hash_string(&first).expect("hash");
    assert_eq!(hash.len(), 64);
    assert_eq!(hash, stable_hash_string(&second).expect("hash"));
    assert_ne!(hash, stable_hash_string(&other).expect("hash"));
}

#[test]
fn atomic_write_replaces_file_and_leaves_no_staging() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("assembly_report.json");
    fs::write(&path, b"stale").expect("seed");

    write_canonical_json(&path, &json!({"samples": 2})).expect("write");

    assert!(!temp.path().join("assembly_report.json.tmp").exists());
    let parsed: Value = from_json_slice(&fs::read(&path).expect("read")).expect("decode");
    assert_eq!(parsed, json!({"samples": 2}));
}

#[test]
fn write_into_missing_directory_is_io_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("missing/report.json");
    let err = write_canonical_json(&path, &json!({})).unwrap_err();
    assert_eq!(err.info().code, "gap_dispatch.json_write");
    assert_eq!(err.exit_code(), 6);
}
