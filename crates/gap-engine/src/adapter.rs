use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gap_core::errors::{io_error, ErrorInfo, GapError};
use gap_core::{Engine, KmerValue};
use gap_reads::{Manifest, Sample};

use crate::abyss::AbyssAdapter;
use crate::masurca::MasurcaAdapter;
use crate::runner::ToolRunner;
use crate::spades::SpadesAdapter;
use crate::unicycler::UnicyclerAdapter;
use crate::velvet::VelvetAdapter;

/// Inputs for one engine run on one sample.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyJob<'a> {
    /// Sample to assemble.
    pub sample: &'a Sample,
    /// Directory holding the read files.
    pub input_dir: &'a Path,
    /// Engine and kmer specific directory, `<out>/<engine>/<kmer>`.
    pub output_dir: &'a Path,
    /// Kmer parameter for this engine.
    pub kmer: &'a KmerValue,
    /// Read lengths used for derived tool parameters.
    pub manifest: &'a Manifest,
}

impl AssemblyJob<'_> {
    /// Per-sample output directory.
    pub fn sample_dir(&self) -> PathBuf {
        self.output_dir.join(&self.sample.prefix)
    }

    /// Full path to the forward read file.
    pub fn forward_path(&self) -> PathBuf {
        self.input_dir.join(&self.sample.forward)
    }

    /// Full path to the reverse read file, when paired.
    pub fn reverse_path(&self) -> Option<PathBuf> {
        self.sample
            .reverse
            .as_ref()
            .map(|reverse| self.input_dir.join(reverse))
    }

    /// Creates the per-sample output directory if absent and returns it.
    pub fn prepare_sample_dir(&self) -> Result<PathBuf, GapError> {
        let dir = self.sample_dir();
        fs::create_dir_all(&dir).map_err(|err| io_error("gap_engine.sample_dir", &dir, err))?;
        Ok(dir)
    }
}

/// Uniform contract around one external assembly engine.
pub trait EngineAdapter: Send + Sync {
    /// Engine wrapped by this adapter.
    fn engine(&self) -> Engine;

    /// Executable that must be invocable for the adapter to work.
    fn program(&self) -> &str;

    /// Every executable a run invokes, starting with [`EngineAdapter::program`].
    fn programs(&self) -> Vec<&str> {
        vec![self.program()]
    }

    /// Assembles one sample, returning the per-sample output directory on success.
    fn run(&self, job: &AssemblyJob<'_>) -> Result<PathBuf, GapError>;
}

/// Rejects `auto` for engines that need an explicit kmer.
pub(crate) fn require_fixed_kmer(engine: Engine, kmer: &KmerValue) -> Result<u32, GapError> {
    kmer.fixed().ok_or_else(|| {
        GapError::Engine(
            ErrorInfo::new("gap_engine.kmer_required", "engine needs a numeric kmer")
                .with_context("engine", engine.name())
                .with_context("kmer", kmer.as_str())
                .with_hint(format!("pass an integer kmer for {}", engine.name())),
        )
    })
}

/// Adapters keyed by engine.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<Engine, Arc<dyn EngineAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with an adapter for every engine, all sharing `runner`.
    pub fn standard(runner: Arc<dyn ToolRunner>) -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(SpadesAdapter::new(runner.clone())));
        registry.insert(Arc::new(MasurcaAdapter::new(runner.clone())));
        registry.insert(Arc::new(UnicyclerAdapter::new(runner.clone())));
        registry.insert(Arc::new(AbyssAdapter::new(runner.clone())));
        registry.insert(Arc::new(VelvetAdapter::new(runner)));
        registry
    }

    /// Registers or replaces the adapter for its engine.
    pub fn insert(&mut self, adapter: Arc<dyn EngineAdapter>) {
        self.adapters.insert(adapter.engine(), adapter);
    }

    /// Adapter for an engine.
    pub fn get(&self, engine: Engine) -> Option<Arc<dyn EngineAdapter>> {
        self.adapters.get(&engine).cloned()
    }

    /// Registered engines in engine order.
    pub fn engines(&self) -> Vec<Engine> {
        self.adapters.keys().copied().collect()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("engines", &self.engines())
            .finish()
    }
}
