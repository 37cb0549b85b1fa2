use std::path::PathBuf;
use std::sync::Arc;

use gap_core::errors::GapError;
use gap_core::Engine;

use crate::adapter::{require_fixed_kmer, AssemblyJob, EngineAdapter};
use crate::runner::{run_checked, ToolInvocation, ToolRunner};

/// Runs the `abyss-pe` driver makefile. Disabled by default.
pub struct AbyssAdapter {
    runner: Arc<dyn ToolRunner>,
    program: String,
}

impl AbyssAdapter {
    /// Adapter invoking `abyss-pe` from `PATH`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            program: "abyss-pe".to_string(),
        }
    }

    /// Overrides the executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Command line for a job writing into `sample_dir`.
    pub fn invocation(
        &self,
        job: &AssemblyJob<'_>,
        sample_dir: PathBuf,
        kmer: u32,
    ) -> ToolInvocation {
        let forward = job.forward_path().display().to_string();
        let reads = match job.reverse_path() {
            Some(reverse) => format!("in={} {}", forward, reverse.display()),
            None => format!("se={forward}"),
        };
        ToolInvocation::new(&self.program)
            .arg("-C")
            .path_arg(&sample_dir)
            .arg(format!("name={}", job.sample.prefix))
            .arg(format!("k={kmer}"))
            .arg(reads)
            .log_to(sample_dir.join("gap-abyss.log"))
    }
}

impl EngineAdapter for AbyssAdapter {
    fn engine(&self) -> Engine {
        Engine::Abyss
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError> {
        let kmer = require_fixed_kmer(Engine::Abyss, job.kmer)?;
        let sample_dir = job.prepare_sample_dir()?;
        run_checked(
            self.runner.as_ref(),
            &self.invocation(job, sample_dir.clone(), kmer),
        )?;
        Ok(sample_dir)
    }
}
