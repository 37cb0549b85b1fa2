use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use gap_core::errors::{io_error, ErrorInfo, GapError};
use serde::{Deserialize, Serialize};

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Program name resolved through `PATH`, or an explicit path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Working directory for the child process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<PathBuf>,
    /// File receiving stdout and stderr; output is discarded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl ToolInvocation {
    /// Starts an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
            log_path: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Sets the working directory.
    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Routes child output to a log file.
    pub fn log_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Space separated rendering used in log lines.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit information for a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOutput {
    /// True when the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

/// Seam between engine adapters and process execution.
pub trait ToolRunner: Send + Sync {
    /// Runs the invocation to completion. Spawn failures are errors; a non-zero
    /// exit is reported through [`ToolOutput`].
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, GapError>;

    /// Returns true when `program` can be invoked.
    fn probe(&self, program: &str) -> bool;
}

/// Runs tools as blocking child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, GapError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());
        if let Some(dir) = &invocation.workdir {
            command.current_dir(dir);
        }
        match &invocation.log_path {
            Some(path) => {
                let stdout = File::create(path).map_err(|err| io_error("gap_engine.tool_log", path, err))?;
                let stderr = stdout
                    .try_clone()
                    .map_err(|err| io_error("gap_engine.tool_log", path, err))?;
                command.stdout(stdout).stderr(stderr);
            }
            None => {
                command.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }
        log::debug!("spawning {}", invocation.command_line());
        let status = command.status().map_err(|err| {
            GapError::Engine(
                ErrorInfo::new("gap_engine.spawn", err.to_string())
                    .with_context("program", invocation.program.as_str()),
            )
        })?;
        Ok(ToolOutput {
            success: status.success(),
            code: status.code(),
        })
    }

    fn probe(&self, program: &str) -> bool {
        find_program(program).is_some()
    }
}

/// Locates an executable on `PATH`, or checks an explicit path.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}

/// Runs an invocation and maps a non-zero exit onto [`GapError::Engine`].
pub fn run_checked(runner: &dyn ToolRunner, invocation: &ToolInvocation) -> Result<(), GapError> {
    let output = runner.run(invocation)?;
    if output.success {
        return Ok(());
    }
    let mut info = ErrorInfo::new("gap_engine.exit_status", "tool exited unsuccessfully")
        .with_context("program", invocation.program.as_str())
        .with_context(
            "exit_code",
            output
                .code
                .map(|code| code.to_string())
                .unwrap_or_else(|| "signal".to_string()),
        );
    if let Some(log) = &invocation.log_path {
        info = info.with_hint(format!("see {}", log.display()));
    }
    Err(GapError::Engine(info))
}
