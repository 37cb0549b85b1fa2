#![deny(missing_docs)]
#![doc = "Idempotent per-sample engine dispatch for the gap pipeline."]

/// Canonical JSON encoding, hashing and atomic writes.
pub mod canonical;
/// Completion detection and the in-process claim set.
pub mod completion;
/// Sample loop, sampling policy and engine fan-out.
pub mod orchestrator;
/// Structured outcomes of an orchestrator run.
pub mod report;

pub use canonical::{
    from_json_slice, stable_hash_string, to_canonical_json_bytes, write_canonical_json,
};
pub use completion::{
    is_done, read_marker, write_marker, Claim, CompletionPolicy, CompletionRecord,
    CompletionTracker, COMPLETE_MARKER,
};
pub use orchestrator::{
    missing_adapters, run_assemblies, RunOpts, SamplingPolicy, DEFAULT_BUDGET, DEFAULT_SELECTOR,
};
pub use report::{AssemblyReport, BudgetSummary, SamplingSkip, SkipReason, UnitOutcome};
