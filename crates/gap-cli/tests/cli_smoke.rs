use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn gap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gap"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn gap")
}

fn path(p: &Path) -> &str {
    p.to_str().expect("utf8 path")
}

#[test]
fn help_lists_subcommands() {
    let output = gap(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("doctor"));
}

#[test]
fn missing_input_directory_exits_with_environment_code() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let missing = temp.path().join("missing");
    let output = gap(&["run", "-i", path(&missing), "-o", path(temp.path())]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn malformed_kmer_exits_with_config_code() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let output = gap(&[
        "run",
        "-i",
        path(temp.path()),
        "-o",
        path(temp.path()),
        "-ks",
        "abc",
    ]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn doctor_passes_when_nothing_is_enabled() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let config = temp.path().join("gap.yaml");
    fs::write(
        &config,
        "engines:\n  spades: false\n  masurca: false\n  velvet: false\nquality_check: false\n",
    )
    .expect("config");
    let output = gap(&["doctor", "--quiet", "-c", path(&config)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"status\": \"ok\""));
    assert!(stdout.contains("spades.py"));
    assert!(stdout.contains("velvetg"));
    assert!(stdout.contains("\"program\": \"bash\""));
}

#[test]
fn enabling_abyss_without_kmer_exits_with_config_code() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let config = temp.path().join("gap.yaml");
    fs::write(&config, "engines:\n  abyss: true\n").expect("config");
    let output = gap(&[
        "run",
        "-i",
        path(temp.path()),
        "-o",
        path(temp.path()),
        "-c",
        path(&config),
    ]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn run_without_engines_writes_report() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let input = temp.path().join("reads");
    let out = temp.path().join("out");
    fs::create_dir_all(&input).expect("input");
    fs::create_dir_all(&out).expect("output");
    fs::write(input.join("S1_1.fq"), b"").expect("fwd");
    fs::write(input.join("S1_2.fq"), b"").expect("rev");
    let manifest = temp.path().join("manifest.tsv");

    let args = [
        "run",
        "-i",
        path(&input),
        "-o",
        path(&out),
        "--manifest",
        path(&manifest),
        "--disable",
        "spades,masurca,velvet",
        "--no-quality-check",
        "--seed",
        "3",
    ];
    let output = gap(&args);
    assert_eq!(output.status.code(), Some(2));

    fs::write(&manifest, "S1_1\t150\nS1_2\t150\n").expect("manifest");
    let output = gap(&args);
    assert!(output.status.success());
    assert!(out.join("assembly_report.json").is_file());
}
