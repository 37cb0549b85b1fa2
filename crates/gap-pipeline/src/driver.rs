use std::path::Path;
use std::sync::Arc;

use gap_core::errors::{ErrorInfo, GapError};
use gap_dispatch::{missing_adapters, run_assemblies};
use gap_engine::{AdapterRegistry, QualityCheck, QuastCheck, ToolRunner};
use gap_reads::{discover_read_sets, load_manifests};

use crate::config::PipelineConfig;
use crate::report::{PipelineReport, QualityOutcome, RunProvenance};

/// Discovery, orchestration and quality check wired to one tool runner.
pub struct Pipeline {
    runner: Arc<dyn ToolRunner>,
    registry: AdapterRegistry,
    quality: Arc<dyn QualityCheck>,
}

impl Pipeline {
    /// Pipeline using the standard adapters and QUAST.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            registry: AdapterRegistry::standard(runner.clone()),
            quality: Arc::new(QuastCheck::new(runner.clone())),
            runner,
        }
    }

    /// Replaces the adapter registry.
    pub fn with_registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the quality check collaborator.
    pub fn with_quality_check(mut self, quality: Arc<dyn QualityCheck>) -> Self {
        self.quality = quality;
        self
    }

    /// Registered adapters.
    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Programs required by the enabled engines that the runner cannot find.
    pub fn missing_programs(&self, config: &PipelineConfig) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for adapter in config
            .engines
            .enabled()
            .into_iter()
            .filter_map(|engine| self.registry.get(engine))
        {
            for program in adapter.programs() {
                if !missing.iter().any(|seen| seen == program) && !self.runner.probe(program) {
                    missing.push(program.to_string());
                }
            }
        }
        missing
    }

    /// Runs the whole pipeline and writes the report into `output_dir`.
    ///
    /// Every stage before the quality check aborts the run on error; engine
    /// failures are recorded in the report instead.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        config: &PipelineConfig,
    ) -> Result<PipelineReport, GapError> {
        require_dir("gap_pipeline.input_directory", "input directory", input_dir)?;
        require_dir("gap_pipeline.output_directory", "output directory", output_dir)?;
        config.validate()?;
        self.verify_engines(config)?;

        let discovery = discover_read_sets(input_dir, &config.discover_opts())?;
        log::info!(
            "found {} {:?} read sets in {}",
            discovery.reads.len(),
            discovery.layout,
            input_dir.display()
        );
        let manifests = load_manifests(
            &config.manifests.pre_trim,
            config.manifests.post_trim.as_deref(),
        )?;
        let kmers = config.kmer_config()?;
        for (engine, kmer) in kmers.iter() {
            log::debug!("{} kmer: {}", engine.label(), kmer);
        }

        let assembly = run_assemblies(
            input_dir,
            output_dir,
            &discovery.reads,
            &manifests,
            &self.registry,
            &config.run_opts(kmers),
        )?;

        let quality = if config.quality_check {
            self.check_quality(output_dir)
        } else {
            QualityOutcome::Disabled
        };

        let report = PipelineReport {
            layout: discovery.layout,
            discovered: discovery.reads.len(),
            assembly,
            quality,
            provenance: RunProvenance::new(config.config_hash()?),
        };
        let path = report.write(output_dir)?;
        log::info!("report written to {}", path.display());
        Ok(report)
    }

    fn verify_engines(&self, config: &PipelineConfig) -> Result<(), GapError> {
        let unregistered = missing_adapters(&self.registry, &config.engines);
        if !unregistered.is_empty() {
            let names: Vec<&str> = unregistered.iter().map(|engine| engine.name()).collect();
            return Err(GapError::Config(
                ErrorInfo::new("gap_pipeline.missing_adapter", "enabled engine has no adapter")
                    .with_context("engines", names.join(",")),
            ));
        }
        let missing = self.missing_programs(config);
        if missing.is_empty() {
            return Ok(());
        }
        Err(GapError::Environment(
            ErrorInfo::new("gap_pipeline.missing_tools", "enabled engines are not installed")
                .with_context("programs", missing.join(","))
                .with_hint("install the tools or disable their engines"),
        ))
    }

    fn check_quality(&self, output_dir: &Path) -> QualityOutcome {
        let program = self.quality.program();
        if !self.runner.probe(program) {
            log::warn!("{program} not found; skipping quality check");
            return QualityOutcome::Failed {
                reason: format!("{program} not found"),
            };
        }
        match self.quality.run(output_dir) {
            Ok(report_dir) => {
                log::info!("quality report in {}", report_dir.display());
                QualityOutcome::Completed { report_dir }
            }
            Err(err) => {
                log::warn!("quality check failed: {err}");
                QualityOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn require_dir(code: &str, what: &str, path: &Path) -> Result<(), GapError> {
    if path.is_dir() {
        return Ok(());
    }
    Err(GapError::Environment(
        ErrorInfo::new(code, format!("{what} does not exist"))
            .with_context("path", path.display().to_string()),
    ))
}
