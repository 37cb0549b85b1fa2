use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gap_core::errors::{io_error, ErrorInfo, GapError};
use gap_core::Engine;

use crate::adapter::{AssemblyJob, EngineAdapter};
use crate::runner::{run_checked, ToolInvocation, ToolRunner};

/// Name of the generated MaSuRCA configuration inside the sample directory.
pub const CONFIG_FILE: &str = "masurca_config.txt";
/// Script emitted by `masurca` from the configuration.
pub const ASSEMBLE_SCRIPT: &str = "assemble.sh";
/// Shell running the generated script.
const SCRIPT_SHELL: &str = "bash";

/// Insert size statistics derived from read lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLengthStats {
    /// Rounded mean of the mate lengths.
    pub mean: u32,
    /// Rounded 15% of the mean.
    pub std_dev: u32,
}

/// `mean = round((fwd + rev) / 2)`, `sd = round(mean * 0.15)`, ties to even.
pub fn read_length_stats(forward: u32, reverse: u32) -> ReadLengthStats {
    let mean = ((f64::from(forward) + f64::from(reverse)) / 2.0).round_ties_even();
    let std_dev = (mean * 0.15).round_ties_even();
    ReadLengthStats {
        mean: mean as u32,
        std_dev: std_dev as u32,
    }
}

/// Writes a MaSuRCA configuration and runs the generated assembly script.
pub struct MasurcaAdapter {
    runner: Arc<dyn ToolRunner>,
    program: String,
    threads: usize,
}

impl MasurcaAdapter {
    /// Adapter invoking `masurca` from `PATH`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            program: "masurca".to_string(),
            threads: 4,
        }
    }

    /// Overrides the executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Thread count written into the configuration.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Derives insert statistics from the manifest. Single-end samples use the
    /// forward length for both mates.
    pub fn stats_for(&self, job: &AssemblyJob<'_>) -> Result<ReadLengthStats, GapError> {
        let lookup = |key: &str| {
            job.manifest.get(key).ok_or_else(|| {
                GapError::Engine(
                    ErrorInfo::new("gap_engine.masurca_read_length", "read length missing from manifest")
                        .with_context("identifier", key),
                )
            })
        };
        let forward = lookup(job.sample.forward_key())?;
        let reverse = match job.sample.reverse_key() {
            Some(key) => lookup(key)?,
            None => forward,
        };
        Ok(read_length_stats(forward, reverse))
    }

    /// Renders the configuration file contents.
    pub fn render_config(&self, job: &AssemblyJob<'_>, stats: ReadLengthStats) -> String {
        let mut reads = job.forward_path().display().to_string();
        if let Some(reverse) = job.reverse_path() {
            reads.push(' ');
            reads.push_str(&reverse.display().to_string());
        }
        let mut config = String::new();
        let _ = writeln!(config, "DATA");
        let _ = writeln!(config, "PE= pe {} {} {}", stats.mean, stats.std_dev, reads);
        let _ = writeln!(config, "END");
        let _ = writeln!(config);
        let _ = writeln!(config, "PARAMETERS");
        let _ = writeln!(config, "GRAPH_KMER_SIZE = {}", job.kmer.as_str());
        let _ = writeln!(config, "NUM_THREADS = {}", self.threads);
        let _ = writeln!(config, "JF_SIZE = 200000000");
        let _ = writeln!(config, "END");
        config
    }

    fn write_config(&self, sample_dir: &Path, contents: &str) -> Result<PathBuf, GapError> {
        let path = sample_dir.join(CONFIG_FILE);
        fs::write(&path, contents).map_err(|err| io_error("gap_engine.masurca_config", &path, err))?;
        Ok(path)
    }
}

impl EngineAdapter for MasurcaAdapter {
    fn engine(&self) -> Engine {
        Engine::Masurca
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn programs(&self) -> Vec<&str> {
        vec![self.program.as_str(), SCRIPT_SHELL]
    }

    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError> {
        let stats = self.stats_for(job)?;
        let sample_dir = job.prepare_sample_dir()?;
        let config = self.write_config(&sample_dir, &self.render_config(job, stats))?;
        log::debug!(
            "MaSuRCA insert stats for {}: mean {} sd {}",
            job.sample.prefix,
            stats.mean,
            stats.std_dev
        );
        let generate = ToolInvocation::new(&self.program)
            .path_arg(&config)
            .workdir(&sample_dir)
            .log_to(sample_dir.join("gap-masurca.log"));
        run_checked(self.runner.as_ref(), &generate)?;
        let assemble = ToolInvocation::new(SCRIPT_SHELL)
            .arg(ASSEMBLE_SCRIPT)
            .workdir(&sample_dir)
            .log_to(sample_dir.join("gap-masurca-assemble.log"));
        run_checked(self.runner.as_ref(), &assemble)?;
        Ok(sample_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_round_like_reference() {
        assert_eq!(
            read_length_stats(150, 160),
            ReadLengthStats {
                mean: 155,
                std_dev: 23
            }
        );
        assert_eq!(read_length_stats(150, 150).std_dev, 22);
        assert_eq!(read_length_stats(150, 159).mean, 154);
        assert_eq!(read_length_stats(151, 160).mean, 156);
    }
}
