use std::path::PathBuf;
use std::sync::Arc;

use gap_core::errors::GapError;
use gap_core::Engine;

use crate::adapter::{AssemblyJob, EngineAdapter};
use crate::runner::{run_checked, ToolInvocation, ToolRunner};

/// Runs `spades.py` in the per-sample directory.
pub struct SpadesAdapter {
    runner: Arc<dyn ToolRunner>,
    program: String,
}

impl SpadesAdapter {
    /// Adapter invoking `spades.py` from `PATH`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            program: "spades.py".to_string(),
        }
    }

    /// Overrides the executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Command line for a job writing into `sample_dir`.
    pub fn invocation(&self, job: &AssemblyJob<'_>, sample_dir: PathBuf) -> ToolInvocation {
        let mut invocation = ToolInvocation::new(&self.program);
        invocation = match job.reverse_path() {
            Some(reverse) => invocation
                .arg("-1")
                .path_arg(&job.forward_path())
                .arg("-2")
                .path_arg(&reverse),
            None => invocation.arg("-s").path_arg(&job.forward_path()),
        };
        if let Some(kmer) = job.kmer.fixed() {
            invocation = invocation.arg("-k").arg(kmer.to_string());
        }
        invocation
            .arg("-o")
            .path_arg(&sample_dir)
            .log_to(sample_dir.join("gap-spades.log"))
    }
}

impl EngineAdapter for SpadesAdapter {
    fn engine(&self) -> Engine {
        Engine::Spades
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError> {
        let sample_dir = job.prepare_sample_dir()?;
        let invocation = self.invocation(job, sample_dir.clone());
        run_checked(self.runner.as_ref(), &invocation)?;
        Ok(sample_dir)
    }
}
