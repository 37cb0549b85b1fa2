use serde::{Deserialize, Serialize};

/// Outcome of one (sample, engine) unit of work within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Output for this sample already exists; the engine was not invoked.
    SkippedAlreadyDone,
    /// The engine ran and exited cleanly.
    Succeeded,
    /// The engine could not be started or exited with an error.
    Failed,
}

impl RunStatus {
    /// True when the unit consumed a fresh processing slot.
    pub fn is_success(self) -> bool {
        matches!(self, RunStatus::Succeeded)
    }
}
