use std::fs;
use std::path::Path;

use gap_core::errors::{ErrorInfo, GapError};
use gap_core::{Engine, EngineToggles, KmerConfig, RunStatus};
use gap_engine::{AdapterRegistry, AssemblyJob, EngineAdapter};
use gap_reads::{Manifests, ReadSetMap, Sample};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::completion::{write_marker, CompletionPolicy, CompletionRecord, CompletionTracker};
use crate::report::{AssemblyReport, BudgetSummary, SamplingSkip, SkipReason, UnitOutcome};

/// Read length selected by the default sampling policy.
pub const DEFAULT_SELECTOR: u32 = 150;
/// Samples processed per run by the default sampling policy.
pub const DEFAULT_BUDGET: usize = 5;

/// Which samples a run processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingPolicy {
    /// Required forward read length; `None` accepts any manifest entry.
    #[serde(default = "default_selector")]
    pub selector: Option<u32>,
    /// Maximum samples consuming a slot; `None` is unbounded.
    #[serde(default = "default_budget")]
    pub budget: Option<usize>,
}

fn default_selector() -> Option<u32> {
    Some(DEFAULT_SELECTOR)
}

fn default_budget() -> Option<usize> {
    Some(DEFAULT_BUDGET)
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            budget: default_budget(),
        }
    }
}

impl SamplingPolicy {
    /// Policy that processes every sample found in the manifest.
    pub fn unbounded() -> Self {
        Self {
            selector: None,
            budget: None,
        }
    }
}

/// Options governing an orchestrator run.
#[derive(Debug, Clone)]
pub struct RunOpts {
    /// Sample selection and budget.
    pub sampling: SamplingPolicy,
    /// Engines to invoke.
    pub engines: EngineToggles,
    /// Kmer per engine; also names the second output directory level.
    pub kmers: KmerConfig,
    /// Completion detection.
    pub completion: CompletionPolicy,
    /// Re-run engines whose output already exists, deleting it first.
    pub replace_existing: bool,
    /// Engines run in parallel per sample.
    pub concurrency: usize,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            sampling: SamplingPolicy::default(),
            engines: EngineToggles::default(),
            kmers: KmerConfig::default(),
            completion: CompletionPolicy::default(),
            replace_existing: false,
            concurrency: 1,
        }
    }
}

/// Runs every enabled engine over the selected samples.
///
/// Engine failures and skips are recorded in the report; only setup problems
/// (missing adapters, worker pool construction) are returned as errors.
pub fn run_assemblies(
    input_dir: &Path,
    output_dir: &Path,
    reads: &ReadSetMap,
    manifests: &Manifests,
    registry: &AdapterRegistry,
    opts: &RunOpts,
) -> Result<AssemblyReport, GapError> {
    let engines = opts.engines.enabled();
    let adapters = engines
        .iter()
        .map(|engine| {
            registry.get(*engine).ok_or_else(|| {
                GapError::Config(
                    ErrorInfo::new("gap_dispatch.missing_adapter", "no adapter registered for enabled engine")
                        .with_context("engine", engine.name()),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.concurrency.max(1))
        .build()
        .map_err(|err| GapError::Environment(ErrorInfo::new("gap_dispatch.thread_pool", err.to_string())))?;
    let tracker = CompletionTracker::new(opts.completion);
    let ctx = DispatchContext {
        input_dir,
        output_dir,
        manifests,
        opts,
        tracker: &tracker,
    };

    let mut report = AssemblyReport {
        budget: BudgetSummary {
            limit: opts.sampling.budget,
            ..BudgetSummary::default()
        },
        ..AssemblyReport::default()
    };
    let mut in_use = 0usize;

    for sample in reads.samples() {
        if opts.sampling.budget.is_some_and(|limit| in_use >= limit) {
            log::info!("sample budget of {} exhausted", in_use);
            report.budget.exhausted = true;
            break;
        }
        if let Some(reason) = sampling_skip(&sample, manifests, &opts.sampling) {
            log::info!("skipping {}: {:?}", sample.forward, reason);
            report.sampling_skips.push(SamplingSkip {
                sample: sample.prefix.clone(),
                forward: sample.forward.clone(),
                reason,
            });
            continue;
        }
        in_use += 1;
        report.budget.consumed += 1;

        let outcomes: Vec<UnitOutcome> = pool.install(|| {
            adapters
                .par_iter()
                .map(|adapter| ctx.dispatch(&sample, adapter.as_ref()))
                .collect()
        });
        if !outcomes.iter().any(|outcome| outcome.status.is_success()) {
            in_use -= 1;
            report.budget.refunded += 1;
        }
        report.outcomes.extend(outcomes);
    }

    log::info!(
        "assembly loop finished: {} succeeded, {} failed, {} already done",
        report.count(RunStatus::Succeeded),
        report.count(RunStatus::Failed),
        report.count(RunStatus::SkippedAlreadyDone)
    );
    Ok(report)
}

fn sampling_skip(sample: &Sample, manifests: &Manifests, policy: &SamplingPolicy) -> Option<SkipReason> {
    let Some(length) = manifests.pre_trim.get(sample.forward_key()) else {
        return Some(SkipReason::NotInManifest);
    };
    match policy.selector {
        Some(selector) if selector != length => Some(SkipReason::SelectorMismatch { length, selector }),
        _ => None,
    }
}

struct DispatchContext<'a> {
    input_dir: &'a Path,
    output_dir: &'a Path,
    manifests: &'a Manifests,
    opts: &'a RunOpts,
    tracker: &'a CompletionTracker,
}

impl DispatchContext<'_> {
    fn dispatch(&self, sample: &Sample, adapter: &dyn EngineAdapter) -> UnitOutcome {
        let engine = adapter.engine();
        let kmer = self.opts.kmers.get(engine);
        let engine_dir = self.output_dir.join(engine.name()).join(kmer.as_str());
        let sample_dir = engine_dir.join(&sample.prefix);
        let outcome = |status: RunStatus, dispatched: bool, reason: Option<String>| UnitOutcome {
            sample: sample.prefix.clone(),
            forward: sample.forward.clone(),
            engine,
            kmer: kmer.to_string(),
            status,
            dispatched,
            reason,
        };

        let Some(_claim) = self.tracker.claim(&sample_dir) else {
            return outcome(
                RunStatus::SkippedAlreadyDone,
                false,
                Some("sample directory claimed by a concurrent job".to_string()),
            );
        };

        if self.opts.replace_existing {
            if let Err(reason) = clear_sample_dir(&sample_dir) {
                return outcome(RunStatus::Failed, false, Some(reason));
            }
        } else if self.tracker.is_stale(&sample.prefix, &engine_dir) {
            log::info!(
                "{} has no completion marker; running {} again in place",
                sample_dir.display(),
                engine.label()
            );
        } else if self.tracker.is_complete(&sample.prefix, &engine_dir) {
            log::info!(
                "files {} & {} have already been processed by {}; delete {} to process them again",
                sample.forward,
                sample.reverse.as_deref().unwrap_or("-"),
                engine.label(),
                sample_dir.display()
            );
            return outcome(RunStatus::SkippedAlreadyDone, false, None);
        }

        if let Err(err) = fs::create_dir_all(&engine_dir) {
            return outcome(
                RunStatus::Failed,
                false,
                Some(format!("cannot create {}: {err}", engine_dir.display())),
            );
        }

        let job = AssemblyJob {
            sample,
            input_dir: self.input_dir,
            output_dir: &engine_dir,
            kmer,
            manifest: &self.manifests.pre_trim,
        };
        log::info!("running {} for {}", engine.label(), sample.prefix);
        match adapter.run(&job) {
            Ok(dir) => {
                let record = CompletionRecord::now(
                    engine,
                    kmer.as_str(),
                    sample.prefix.as_str(),
                    sample.forward.as_str(),
                    sample.reverse.clone(),
                );
                match write_marker(&dir, &record) {
                    Ok(()) => outcome(RunStatus::Succeeded, true, None),
                    Err(err) => {
                        log::warn!("{} finished for {} but the marker failed: {err}", engine.label(), sample.prefix);
                        outcome(RunStatus::Failed, true, Some(err.to_string()))
                    }
                }
            }
            Err(err) => {
                log::warn!(
                    "{} process failed for reads {} and {}: {err}",
                    engine.label(),
                    sample.forward,
                    sample.reverse.as_deref().unwrap_or("-")
                );
                outcome(RunStatus::Failed, true, Some(err.to_string()))
            }
        }
    }
}

fn clear_sample_dir(sample_dir: &Path) -> Result<(), String> {
    if !sample_dir.exists() {
        return Ok(());
    }
    log::info!("removing previous output {}", sample_dir.display());
    fs::remove_dir_all(sample_dir).map_err(|err| format!("cannot remove {}: {err}", sample_dir.display()))
}

/// Enabled engines that have no registered adapter.
pub fn missing_adapters(registry: &AdapterRegistry, engines: &EngineToggles) -> Vec<Engine> {
    engines
        .enabled()
        .into_iter()
        .filter(|engine| registry.get(*engine).is_none())
        .collect()
}
