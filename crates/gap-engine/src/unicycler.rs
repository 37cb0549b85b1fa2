use std::path::PathBuf;
use std::sync::Arc;

use gap_core::errors::GapError;
use gap_core::Engine;

use crate::adapter::{AssemblyJob, EngineAdapter};
use crate::runner::{run_checked, ToolInvocation, ToolRunner};

/// Runs `unicycler` with short reads only. Disabled by default.
pub struct UnicyclerAdapter {
    runner: Arc<dyn ToolRunner>,
    program: String,
}

impl UnicyclerAdapter {
    /// Adapter invoking `unicycler` from `PATH`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            program: "unicycler".to_string(),
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
            invocation = invocation.arg("--kmers").arg(kmer.to_string());
        }
        invocation
            .arg("-o")
            .path_arg(&sample_dir)
            .log_to(sample_dir.join("gap-unicycler.log"))
    }
}

impl EngineAdapter for UnicyclerAdapter {
    fn engine(&self) -> Engine {
        Engine::Unicycler
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError> {
        let sample_dir = job.prepare_sample_dir()?;
        run_checked(self.runner.as_ref(), &self.invocation(job, sample_dir.clone()))?;
        Ok(sample_dir)
    }
}
