use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gap_core::errors::{io_error, ErrorInfo, GapError};
use gap_core::{EngineToggles, KmerConfig};
use gap_dispatch::{stable_hash_string, CompletionPolicy, RunOpts, SamplingPolicy};
use gap_reads::{DiscoverOpts, NamingPolicy, PRE_TRIM_MANIFEST_PATH};
use serde::{Deserialize, Serialize};

fn yaml_error(code: &str, err: impl ToString) -> GapError {
    GapError::Config(ErrorInfo::new(code, err.to_string()))
}

/// Locations of the read length manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestPaths {
    /// Pre-trim manifest; required at run time.
    #[serde(default = "default_pre_trim")]
    pub pre_trim: PathBuf,
    /// Post-trim manifest, loaded only when set.
    #[serde(default)]
    pub post_trim: Option<PathBuf>,
}

fn default_pre_trim() -> PathBuf {
    PathBuf::from(PRE_TRIM_MANIFEST_PATH)
}

impl Default for ManifestPaths {
    fn default() -> Self {
        Self {
            pre_trim: default_pre_trim(),
            post_trim: None,
        }
    }
}

/// Resolved settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Kmer overrides keyed by engine name.
    #[serde(default)]
    pub kmers: BTreeMap<String, String>,
    /// Engines to run.
    #[serde(default)]
    pub engines: EngineToggles,
    /// Sample selection and budget.
    #[serde(default)]
    pub sampling: SamplingPolicy,
    /// Manifest locations.
    #[serde(default)]
    pub manifests: ManifestPaths,
    /// Completion detection.
    #[serde(default)]
    pub completion: CompletionPolicy,
    /// Read file naming enforcement.
    #[serde(default)]
    pub naming: NamingPolicy,
    /// Engines run in parallel per sample.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Seed for the read set shuffle.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    /// Delete and re-run existing sample outputs.
    #[serde(default)]
    pub replace_existing: bool,
    /// Run QUAST over the output tree after assembly.
    #[serde(default = "default_quality_check")]
    pub quality_check: bool,
}

fn default_concurrency() -> usize {
    1
}

fn default_quality_check() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kmers: BTreeMap::new(),
            engines: EngineToggles::default(),
            sampling: SamplingPolicy::default(),
            manifests: ManifestPaths::default(),
            completion: CompletionPolicy::default(),
            naming: NamingPolicy::default(),
            concurrency: default_concurrency(),
            shuffle_seed: None,
            replace_existing: false,
            quality_check: default_quality_check(),
        }
    }
}

impl PipelineConfig {
    /// Parses a YAML document; absent keys take their defaults.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, GapError> {
        let config: Self =
            serde_yaml::from_slice(data).map_err(|err| yaml_error("gap_pipeline.config_yaml", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, GapError> {
        let bytes = fs::read(path).map_err(|err| io_error("gap_pipeline.config_read", path, err))?;
        Self::from_yaml_slice(&bytes).map_err(|err| match err {
            GapError::Config(info) => {
                GapError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, GapError> {
        serde_yaml::to_string(self).map_err(|err| yaml_error("gap_pipeline.config_yaml", err))
    }

    /// Rejects settings that cannot drive a run.
    pub fn validate(&self) -> Result<(), GapError> {
        if self.concurrency == 0 {
            return Err(GapError::Config(
                ErrorInfo::new("gap_pipeline.concurrency", "concurrency must be at least 1")
                    .with_context("concurrency", "0"),
            ));
        }
        if self.sampling.budget == Some(0) {
            return Err(GapError::Config(
                ErrorInfo::new("gap_pipeline.budget", "sample budget must be at least 1")
                    .with_hint("omit the budget to process every sample"),
            ));
        }
        let kmers = self.kmer_config()?;
        for engine in self.engines.enabled() {
            let kmer = kmers.get(engine);
            if engine.needs_fixed_kmer() && kmer.fixed().is_none() {
                return Err(GapError::Config(
                    ErrorInfo::new("gap_pipeline.kmer_required", "enabled engine needs a numeric kmer")
                        .with_context("engine", engine.name())
                        .with_context("kmer", kmer.as_str())
                        .with_hint(format!("set an integer kmer for {} or disable it", engine.name())),
                ));
            }
        }
        Ok(())
    }

    /// Kmer values with defaults filled in.
    pub fn kmer_config(&self) -> Result<KmerConfig, GapError> {
        KmerConfig::resolve(&self.kmers)
    }

    /// Canonical SHA-256 of this configuration.
    pub fn config_hash(&self) -> Result<String, GapError> {
        stable_hash_string(self)
    }

    /// Discovery options derived from this configuration.
    pub fn discover_opts(&self) -> DiscoverOpts {
        DiscoverOpts {
            naming: self.naming,
            shuffle_seed: self.shuffle_seed,
        }
    }

    /// Orchestrator options for the resolved kmers.
    pub fn run_opts(&self, kmers: KmerConfig) -> RunOpts {
        RunOpts {
            sampling: self.sampling,
            engines: self.engines,
            kmers,
            completion: self.completion,
            replace_existing: self.replace_existing,
            concurrency: self.concurrency,
        }
    }
}
