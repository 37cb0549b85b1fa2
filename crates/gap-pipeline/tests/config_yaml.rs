use std::path::PathBuf;

use gap_core::{Engine, GapError};
use gap_dispatch::CompletionPolicy;
use gap_pipeline::PipelineConfig;
use gap_reads::NamingPolicy;

#[test]
fn empty_document_yields_defaults() {
    let config = PipelineConfig::from_yaml_slice(b"{}").expect("parse");
    assert_eq!(config, PipelineConfig::default());
    assert_eq!(config.sampling.selector, Some(150));
    assert_eq!(config.sampling.budget, Some(5));
    assert_eq!(
        config.manifests.pre_trim,
        PathBuf::from("tmp/pre_trim_manifest.tsv")
    );
    assert!(config.manifests.post_trim.is_none());
    assert!(config.quality_check);
    assert_eq!(config.completion, CompletionPolicy::Marker);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let yaml = br#"
engines:
  abyss: true
sampling:
  budget: null
kmers:
  abyss: "64"
naming: strict
completion: directory
concurrency: 4
shuffle_seed: 7
"#;
    let config = PipelineConfig::from_yaml_slice(yaml).expect("parse");
    assert!(config.engines.is_enabled(Engine::Abyss));
    assert!(config.engines.is_enabled(Engine::Spades));
    assert!(!config.engines.is_enabled(Engine::Unicycler));
    assert_eq!(config.sampling.selector, Some(150));
    assert_eq!(config.sampling.budget, None);
    assert_eq!(config.naming, NamingPolicy::Strict);
    assert_eq!(config.completion, CompletionPolicy::Directory);
    assert_eq!(config.discover_opts().shuffle_seed, Some(7));

    let kmers = config.kmer_config().expect("kmers");
    assert_eq!(kmers.get(Engine::Abyss).as_str(), "64");
    assert_eq!(kmers.get(Engine::Velvet).as_str(), "91");
    assert_eq!(config.run_opts(kmers).concurrency, 4);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = PipelineConfig::from_yaml_slice(b"threads: 8\n").unwrap_err();
    assert!(matches!(err, GapError::Config(_)));

    let err = PipelineConfig::from_yaml_slice(b"engines:\n  megahit: true\n").unwrap_err();
    assert!(matches!(err, GapError::Config(_)));
}

#[test]
fn unknown_kmer_tool_is_a_config_error() {
    let err = PipelineConfig::from_yaml_slice(b"kmers:\n  megahit: \"31\"\n").unwrap_err();
    assert!(matches!(err, GapError::Config(_)));
    assert_eq!(err.info().code, "gap_core.unknown_engine");
}

#[test]
fn zero_concurrency_and_budget_are_rejected() {
    let err = PipelineConfig::from_yaml_slice(b"concurrency: 0\n").unwrap_err();
    assert_eq!(err.info().code, "gap_pipeline.concurrency");
    let err = PipelineConfig::from_yaml_slice(b"sampling:\n  budget: 0\n").unwrap_err();
    assert_eq!(err.info().code, "gap_pipeline.budget");
}

#[test]
fn auto_kmer_for_fixed_kmer_engine_is_rejected() {
    let err = PipelineConfig::from_yaml_slice(b"engines:\n  abyss: true\n").unwrap_err();
    assert!(matches!(err, GapError::Config(_)));
    assert_eq!(err.info().code, "gap_pipeline.kmer_required");
    assert_eq!(err.info().context.get("engine").map(String::as_str), Some("abyss"));
    assert_eq!(err.exit_code(), 3);

    let err = PipelineConfig::from_yaml_slice(b"kmers:\n  velvet: auto\n").unwrap_err();
    assert_eq!(err.info().context.get("engine").map(String::as_str), Some("velvet"));

    let disabled = b"engines:\n  velvet: false\nkmers:\n  velvet: auto\n";
    assert!(PipelineConfig::from_yaml_slice(disabled).is_ok());
    let fixed = b"engines:\n  abyss: true\nkmers:\n  abyss: \"64\"\n";
    assert!(PipelineConfig::from_yaml_slice(fixed).is_ok());
}

#[test]
fn config_hash_tracks_content() {
    let base = PipelineConfig::default();
    let mut changed = base.clone();
    changed.replace_existing = true;
    assert_eq!(base.config_hash().expect("hash"), base.config_hash().expect("hash"));
    assert_ne!(base.config_hash().expect("hash"), changed.config_hash().expect("hash"));
}

#[test]
fn yaml_round_trip_preserves_config() {
    let mut config = PipelineConfig::default();
    config.kmers.insert("spades".into(), "55".into());
    config.manifests.post_trim = Some(PathBuf::from("tmp/post_trim_manifest.tsv"));
    let yaml = config.to_yaml_string().expect("yaml");
    let parsed = PipelineConfig::from_yaml_slice(yaml.as_bytes()).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn load_reports_missing_file_as_io() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let err = PipelineConfig::load(&temp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, GapError::Io(_)));
}
