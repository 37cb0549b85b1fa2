use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use gap_core::{Engine, GapError, RunStatus};
use gap_dispatch::CompletionPolicy;
use gap_engine::SystemRunner;
use gap_pipeline::{Pipeline, PipelineConfig};
use gap_reads::NamingPolicy;

use super::base_config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory holding the read files.
    #[arg(short = 'i', long = "input-directory")]
    pub input_directory: PathBuf,
    /// Root of the `<engine>/<kmer>/<sample>` output tree.
    #[arg(short = 'o', long = "output-directory")]
    pub output_directory: PathBuf,
    /// ABySS kmer (`-ka`).
    #[arg(long = "kmer-abyss", value_name = "KMER")]
    pub kmer_abyss: Option<String>,
    /// SPAdes kmer (`-ks`).
    #[arg(long = "kmer-spades", value_name = "KMER")]
    pub kmer_spades: Option<String>,
    /// MaSuRCA kmer (`-km`).
    #[arg(long = "kmer-masurca", value_name = "KMER")]
    pub kmer_masurca: Option<String>,
    /// Unicycler kmers (`-ku`).
    #[arg(long = "kmer-unicycler", value_name = "KMER")]
    pub kmer_unicycler: Option<String>,
    /// Velvet kmer (`-kv`).
    #[arg(long = "kmer-velvet", value_name = "KMER")]
    pub kmer_velvet: Option<String>,
    /// Delete existing sample outputs and assemble again.
    #[arg(short = 'r', long = "replace-output-files")]
    pub replace_output_files: bool,
    /// YAML configuration applied before these flags.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Forward read length a sample must have to be processed.
    #[arg(long, conflicts_with = "any_length")]
    pub selector: Option<u32>,
    /// Process samples of every read length.
    #[arg(long)]
    pub any_length: bool,
    /// Maximum number of samples assembled in this run.
    #[arg(long, conflicts_with = "unbounded")]
    pub budget: Option<usize>,
    /// Process every selected sample.
    #[arg(long)]
    pub unbounded: bool,
    /// Pre-trim read length manifest.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Post-trim read length manifest.
    #[arg(long)]
    pub post_trim_manifest: Option<PathBuf>,
    /// Engines run in parallel for each sample.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
    /// Seed for the read set shuffle.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Reject read files without `_1`/`_2` markers.
    #[arg(long)]
    pub strict_naming: bool,
    /// Treat any existing sample directory as finished.
    #[arg(long)]
    pub trust_existing_dirs: bool,
    /// Engines to switch on (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub enable: Vec<Engine>,
    /// Engines to switch off (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<Engine>,
    /// Skip QUAST after assembly.
    #[arg(long)]
    pub no_quality_check: bool,
}

impl RunArgs {
    /// Applies the flags on top of `config`.
    pub fn apply(&self, config: &mut PipelineConfig) {
        let kmers = [
            (Engine::Abyss, &self.kmer_abyss),
            (Engine::Spades, &self.kmer_spades),
            (Engine::Masurca, &self.kmer_masurca),
            (Engine::Unicycler, &self.kmer_unicycler),
            (Engine::Velvet, &self.kmer_velvet),
        ];
        for (engine, value) in kmers {
            if let Some(value) = value {
                config.kmers.insert(engine.name().to_string(), value.clone());
            }
        }
        for engine in &self.enable {
            config.engines.set(*engine, true);
        }
        for engine in &self.disable {
            config.engines.set(*engine, false);
        }
        if self.selector.is_some() {
            config.sampling.selector = self.selector;
        }
        if self.any_length {
            config.sampling.selector = None;
        }
        if self.budget.is_some() {
            config.sampling.budget = self.budget;
        }
        if self.unbounded {
            config.sampling.budget = None;
        }
        if let Some(path) = &self.manifest {
            config.manifests.pre_trim = path.clone();
        }
        if let Some(path) = &self.post_trim_manifest {
            config.manifests.post_trim = Some(path.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if self.seed.is_some() {
            config.shuffle_seed = self.seed;
        }
        if self.strict_naming {
            config.naming = NamingPolicy::Strict;
        }
        if self.trust_existing_dirs {
            config.completion = CompletionPolicy::Directory;
        }
        if self.replace_output_files {
            config.replace_existing = true;
        }
        if self.no_quality_check {
            config.quality_check = false;
        }
    }
}

pub fn run(args: &RunArgs) -> Result<(), GapError> {
    let mut config = base_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let pipeline = Pipeline::new(Arc::new(SystemRunner));
    let report = pipeline.run(&args.input_directory, &args.output_directory, &config)?;
    let assembly = &report.assembly;
    println!(
        "{} succeeded, {} failed, {} already done, {} skipped by sampling",
        assembly.count(RunStatus::Succeeded),
        assembly.count(RunStatus::Failed),
        assembly.count(RunStatus::SkippedAlreadyDone),
        assembly.sampling_skips.len()
    );
    Ok(())
}
