use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gap_core::{Engine, EngineToggles, ErrorInfo, GapError, RunStatus};
use gap_dispatch::{run_assemblies, AssemblyReport, RunOpts, SamplingPolicy, SkipReason};
use gap_engine::{AdapterRegistry, AssemblyJob, EngineAdapter};
use gap_reads::{Manifest, Manifests, ReadSetMap};

#[derive(Default)]
struct ScriptedAdapter {
    seen: Mutex<Vec<String>>,
    failing_samples: Vec<&'static str>,
}

impl ScriptedAdapter {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }
}

impl EngineAdapter for ScriptedAdapter {
    fn engine(&self) -> Engine {
        Engine::Spades
    }

    fn program(&self) -> &str {
        "fake-spades"
    }

    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError> {
        self.seen.lock().expect("lock").push(job.sample.prefix.clone());
        let dir = job.prepare_sample_dir()?;
        if self.failing_samples.contains(&job.sample.prefix.as_str()) {
            return Err(GapError::Engine(ErrorInfo::new("fake.failure", "assembler crashed")));
        }
        Ok(dir)
    }
}

fn paired(prefixes: &[&str]) -> ReadSetMap {
    prefixes
        .iter()
        .map(|prefix| (format!("{prefix}_1.fq"), Some(format!("{prefix}_2.fq"))))
        .collect()
}

fn manifest(rows: &[(&str, u32)]) -> Manifests {
    Manifests {
        pre_trim: rows
            .iter()
            .map(|(key, len)| (key.to_string(), *len))
            .collect::<Manifest>(),
        post_trim: None,
    }
}

fn opts(sampling: SamplingPolicy) -> RunOpts {
    RunOpts {
        sampling,
        engines: EngineToggles::none().with(Engine::Spades, true),
        ..RunOpts::default()
    }
}

fn run(
    out: &Path,
    adapter: &Arc<ScriptedAdapter>,
    reads: &ReadSetMap,
    manifests: &Manifests,
    opts: &RunOpts,
) -> AssemblyReport {
    let mut registry = AdapterRegistry::new();
    registry.insert(adapter.clone());
    run_assemblies(Path::new("/reads"), out, reads, manifests, &registry, opts).expect("run")
}

#[test]
fn selector_filters_on_forward_read_length() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let adapter = Arc::new(ScriptedAdapter::default());
    let reads = paired(&["A", "B"]);
    let manifests = manifest(&[("A_1", 150), ("A_2", 150), ("B_1", 100), ("B_2", 100)]);

    let report = run(temp.path(), &adapter, &reads, &manifests, &opts(SamplingPolicy::default()));

    assert_eq!(adapter.seen(), vec!["A".to_string()]);
    assert_eq!(report.sampling_skips.len(), 1);
    assert_eq!(report.sampling_skips[0].sample, "B");
    assert_eq!(
        report.sampling_skips[0].reason,
        SkipReason::SelectorMismatch {
            length: 100,
            selector: 150
        }
    );
    assert_eq!(report.budget.consumed, 1);
    assert!(!temp.path().join("spades/auto/B").exists());
}

#[test]
fn samples_missing_from_manifest_are_skipped() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let adapter = Arc::new(ScriptedAdapter::default());
    let reads = paired(&["A"]);
    let manifests = manifest(&[("Z_1", 150)]);

    let report = run(temp.path(), &adapter, &reads, &manifests, &opts(SamplingPolicy::default()));

    assert!(adapter.seen().is_empty());
    assert_eq!(report.sampling_skips[0].reason, SkipReason::NotInManifest);
    assert_eq!(report.budget.consumed, 0);
}

#[test]
fn budget_caps_processed_samples() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let adapter = Arc::new(ScriptedAdapter::default());
    let prefixes = ["S1", "S2", "S3", "S4", "S5", "S6", "S7"];
    let reads = paired(&prefixes);
    let rows: Vec<(String, u32)> = prefixes.iter().map(|p| (format!("{p}_1"), 150)).collect();
    let manifests = Manifests {
        pre_trim: rows.into_iter().collect(),
        post_trim: None,
    };

    let report = run(temp.path(), &adapter, &reads, &manifests, &opts(SamplingPolicy::default()));

    assert_eq!(adapter.seen(), vec!["S1", "S2", "S3", "S4", "S5"]);
    assert_eq!(report.budget.consumed, 5);
    assert!(report.budget.exhausted);
    assert_eq!(report.outcome("S6", Engine::Spades), None);
}

#[test]
fn failed_samples_refund_their_slot() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let adapter = Arc::new(ScriptedAdapter {
        failing_samples: vec!["S1"],
        ..ScriptedAdapter::default()
    });
    let reads = paired(&["S1", "S2", "S3"]);
    let manifests = manifest(&[("S1_1", 150), ("S2_1", 150), ("S3_1", 150)]);
    let sampling = SamplingPolicy {
        selector: Some(150),
        budget: Some(2),
    };

    let report = run(temp.path(), &adapter, &reads, &manifests, &opts(sampling));

    assert_eq!(adapter.seen(), vec!["S1", "S2", "S3"]);
    assert_eq!(report.count(RunStatus::Failed), 1);
    assert_eq!(report.count(RunStatus::Succeeded), 2);
    assert_eq!(report.budget.refunded, 1);
    assert!(!report.budget.exhausted);
}

#[test]
fn already_done_samples_do_not_consume_budget() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let adapter = Arc::new(ScriptedAdapter::default());
    let manifests = manifest(&[("S1_1", 150), ("S2_1", 150), ("S3_1", 150)]);
    let sampling = SamplingPolicy {
        selector: Some(150),
        budget: Some(1),
    };
    run(temp.path(), &adapter, &paired(&["S1"]), &manifests, &opts(sampling));

    let report = run(temp.path(), &adapter, &paired(&["S1", "S2", "S3"]), &manifests, &opts(sampling));

    assert_eq!(adapter.seen(), vec!["S1", "S2"]);
    assert_eq!(
        report.outcome("S1", Engine::Spades).map(|o| o.status),
        Some(RunStatus::SkippedAlreadyDone)
    );
    assert_eq!(
        report.outcome("S2", Engine::Spades).map(|o| o.status),
        Some(RunStatus::Succeeded)
    );
    assert!(report.budget.exhausted);
    assert_eq!(report.outcome("S3", Engine::Spades), None);
}

#[test]
fn unbounded_policy_accepts_any_length() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let adapter = Arc::new(ScriptedAdapter::default());
    let reads = paired(&["A", "B"]);
    let manifests = manifest(&[("A_1", 150), ("B_1", 100)]);

    let report = run(temp.path(), &adapter, &reads, &manifests, &opts(SamplingPolicy::unbounded()));

    assert_eq!(adapter.seen(), vec!["A", "B"]);
    assert!(report.sampling_skips.is_empty());
    assert_eq!(report.budget.limit, None);
}
