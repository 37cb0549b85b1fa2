use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use gap_core::{Engine, ErrorInfo, GapError};
use gap_dispatch::to_canonical_json_bytes;
use gap_engine::{find_program, AdapterRegistry, SystemRunner};
use serde::Serialize;

use super::base_config;

const QUALITY_PROGRAM: &str = "quast.py";

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// YAML configuration deciding which engines are enabled.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Emit only JSON.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    program: String,
    enabled: bool,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(args: &DoctorArgs) -> Result<(), GapError> {
    let config = base_config(args.config.as_deref())?;
    let registry = AdapterRegistry::standard(Arc::new(SystemRunner));
    let mut checks: Vec<DoctorCheck> = Engine::ALL
        .into_iter()
        .filter_map(|engine| registry.get(engine).map(|adapter| (engine, adapter)))
        .flat_map(|(engine, adapter)| {
            let enabled = config.engines.is_enabled(engine);
            adapter
                .programs()
                .into_iter()
                .map(|program| check_program(engine.name(), program, enabled))
                .collect::<Vec<_>>()
        })
        .collect();
    let missing: Vec<String> = checks
        .iter()
        .filter(|check| check.enabled && !check.ok)
        .map(|check| check.program.clone())
        .collect();
    // QUAST is reported but never required
    checks.push(check_program("quast", QUALITY_PROGRAM, config.quality_check));

    let status = if missing.is_empty() { "ok" } else { "needs-attention" };
    let report = DoctorReport {
        status: status.into(),
        checks,
    };
    let json = to_canonical_json_bytes(&report)?;
    let rendered = String::from_utf8_lossy(&json);
    if args.quiet {
        print!("{rendered}");
    } else {
        println!("gap doctor status: {}", report.status);
        print!("{rendered}");
    }
    if missing.is_empty() {
        return Ok(());
    }
    Err(GapError::Environment(
        ErrorInfo::new("gap_cli.doctor", "enabled engines are not installed")
            .with_context("programs", missing.join(",")),
    ))
}

fn check_program(name: &str, program: &str, enabled: bool) -> DoctorCheck {
    let (ok, detail) = match find_program(program) {
        Some(path) => (true, path.display().to_string()),
        None => (false, "missing".to_string()),
    };
    DoctorCheck {
        name: name.into(),
        program: program.into(),
        enabled,
        ok,
        detail,
    }
}
