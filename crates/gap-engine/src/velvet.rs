use std::path::PathBuf;
use std::sync::Arc;

use gap_core::errors::GapError;
use gap_core::Engine;

use crate::adapter::{require_fixed_kmer, AssemblyJob, EngineAdapter};
use crate::runner::{run_checked, ToolInvocation, ToolRunner};

/// Runs `velveth` followed by `velvetg` on the same directory.
pub struct VelvetAdapter {
    runner: Arc<dyn ToolRunner>,
    hash_program: String,
    graph_program: String,
}

fn read_format(file_name: &str) -> &'static str {
    if file_name.ends_with(".gz") {
        "-fastq.gz"
    } else {
        "-fastq"
    }
}

impl VelvetAdapter {
    /// Adapter invoking `velveth` and `velvetg` from `PATH`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            hash_program: "velveth".to_string(),
            graph_program: "velvetg".to_string(),
        }
    }

    /// Hashing step.
    pub fn hash_invocation(
        &self,
        job: &AssemblyJob<'_>,
        sample_dir: PathBuf,
        kmer: u32,
    ) -> ToolInvocation {
        let invocation = ToolInvocation::new(&self.hash_program)
            .path_arg(&sample_dir)
            .arg(kmer.to_string())
            .arg(read_format(&job.sample.forward));
        let invocation = match job.reverse_path() {
            Some(reverse) => invocation
                .arg("-shortPaired")
                .arg("-separate")
                .path_arg(&job.forward_path())
                .path_arg(&reverse),
            None => invocation.arg("-short").path_arg(&job.forward_path()),
        };
        invocation.log_to(sample_dir.join("gap-velveth.log"))
    }

    /// Graph construction step.
    pub fn graph_invocation(&self, sample_dir: PathBuf) -> ToolInvocation {
        ToolInvocation::new(&self.graph_program)
            .path_arg(&sample_dir)
            .arg("-exp_cov")
            .arg("auto")
            .arg("-cov_cutoff")
            .arg("auto")
            .log_to(sample_dir.join("gap-velvetg.log"))
    }
}

impl EngineAdapter for VelvetAdapter {
    fn engine(&self) -> Engine {
        Engine::Velvet
    }

    fn program(&self) -> &str {
        &self.hash_program
    }

    fn programs(&self) -> Vec<&str> {
        vec![self.hash_program.as_str(), self.graph_program.as_str()]
    }

    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError> {
        let kmer = require_fixed_kmer(Engine::Velvet, job.kmer)?;
        let sample_dir = job.prepare_sample_dir()?;
        run_checked(
            self.runner.as_ref(),
            &self.hash_invocation(job, sample_dir.clone(), kmer),
        )?;
        run_checked(self.runner.as_ref(), &self.graph_invocation(sample_dir.clone()))?;
        Ok(sample_dir)
    }
}
