use std::path::{Path, PathBuf};
use std::sync::Arc;

use gap_core::errors::{ErrorInfo, GapError};
use walkdir::WalkDir;

use crate::runner::{run_checked, ToolInvocation, ToolRunner};

/// Directory under the output root where QUAST writes its report.
pub const QUAST_DIR: &str = "quast";

const CONTIG_FILE_NAMES: [&str; 5] = [
    "contigs.fasta",
    "contigs.fa",
    "assembly.fasta",
    "final.genome.scf.fasta",
    "primary.genome.scf.fasta",
];

fn is_contig_file(name: &str) -> bool {
    CONTIG_FILE_NAMES.contains(&name) || name.ends_with("-contigs.fa")
}

/// Contig files produced by the engines below `output_root`, sorted by path.
pub fn collect_contigs(output_root: &Path) -> Vec<PathBuf> {
    let quast_dir = output_root.join(QUAST_DIR);
    let mut contigs: Vec<PathBuf> = WalkDir::new(output_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.path() != quast_dir.as_path())
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(is_contig_file))
        .map(|entry| entry.into_path())
        .collect();
    contigs.sort();
    contigs
}

/// Downstream assessment over the whole output tree.
pub trait QualityCheck: Send + Sync {
    /// Executable that must be invocable.
    fn program(&self) -> &str;

    /// Runs the assessment, returning the report directory.
    fn run(&self, output_root: &Path) -> Result<PathBuf, GapError>;
}

/// QUAST over every contig file found in the output tree.
pub struct QuastCheck {
    runner: Arc<dyn ToolRunner>,
    program: String,
}

impl QuastCheck {
    /// Check invoking `quast.py` from `PATH`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            program: "quast.py".to_string(),
        }
    }

    /// Overrides the executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Command line for the given contigs, labelled by their path below the root.
    pub fn invocation(&self, output_root: &Path, contigs: &[PathBuf]) -> ToolInvocation {
        let report_dir = output_root.join(QUAST_DIR);
        let labels: Vec<String> = contigs
            .iter()
            .map(|path| {
                path.parent()
                    .and_then(|parent| parent.strip_prefix(output_root).ok())
                    .map(|rel| rel.display().to_string().replace(['/', '\\'], "_"))
                    .unwrap_or_else(|| path.display().to_string())
            })
            .collect();
        let mut invocation = ToolInvocation::new(&self.program)
            .arg("-o")
            .path_arg(&report_dir)
            .arg("-l")
            .arg(labels.join(","));
        for contig in contigs {
            invocation = invocation.path_arg(contig);
        }
        invocation
    }
}

impl QualityCheck for QuastCheck {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, output_root: &Path) -> Result<PathBuf, GapError> {
        let contigs = collect_contigs(output_root);
        if contigs.is_empty() {
            return Err(GapError::Engine(
                ErrorInfo::new("gap_engine.no_contigs", "no contig files found for quality check")
                    .with_context("path", output_root.display().to_string()),
            ));
        }
        log::info!("running QUAST over {} assemblies", contigs.len());
        let invocation = self.invocation(output_root, &contigs);
        run_checked(self.runner.as_ref(), &invocation)?;
        Ok(output_root.join(QUAST_DIR))
    }
}
