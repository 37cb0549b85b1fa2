use gap_core::{Engine, RunStatus};
use serde::{Deserialize, Serialize};

/// Outcome of one (sample, engine) unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOutcome {
    /// Sample prefix.
    pub sample: String,
    /// Forward read file of the sample.
    pub forward: String,
    /// Engine evaluated.
    pub engine: Engine,
    /// Kmer value used for the engine.
    pub kmer: String,
    /// Result of the unit.
    pub status: RunStatus,
    /// True when the engine adapter was invoked.
    pub dispatched: bool,
    /// Skip or failure explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Why a sample never reached the engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SkipReason {
    /// The forward file has no manifest row.
    NotInManifest,
    /// The forward read length differs from the sampling selector.
    SelectorMismatch {
        /// Length recorded in the manifest.
        length: u32,
        /// Length the policy selects.
        selector: u32,
    },
}

/// A sample dropped by the sampling policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingSkip {
    /// Sample prefix.
    pub sample: String,
    /// Forward read file.
    pub forward: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Sample budget accounting for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Configured cap, `None` when unbounded.
    pub limit: Option<usize>,
    /// Samples that consumed a slot.
    pub consumed: usize,
    /// Slots handed back because no engine produced new output.
    pub refunded: usize,
    /// True when iteration stopped on the cap.
    pub exhausted: bool,
}

/// Structured result of the assembly orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    /// Per (sample, engine) outcomes in processing order.
    pub outcomes: Vec<UnitOutcome>,
    /// Samples dropped before dispatch.
    pub sampling_skips: Vec<SamplingSkip>,
    /// Budget accounting.
    pub budget: BudgetSummary,
}

impl AssemblyReport {
    /// Number of outcomes with the given status.
    pub fn count(&self, status: RunStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == status)
            .count()
    }

    /// Number of adapter invocations.
    pub fn invocations(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.dispatched).count()
    }

    /// Outcome recorded for a sample and engine.
    pub fn outcome(&self, sample: &str, engine: Engine) -> Option<&UnitOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.sample == sample && outcome.engine == engine)
    }
}
