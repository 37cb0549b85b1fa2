//! Structured error types shared across gap crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`GapError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, sample names, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the assembly pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum GapError {
    /// Missing directories or external tools.
    #[error("environment error: {0}")]
    Environment(ErrorInfo),
    /// Invalid pipeline configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Input directory could not be classified into read sets.
    #[error("discovery error: {0}")]
    Discovery(ErrorInfo),
    /// Malformed manifest rows.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// External engine execution failures.
    #[error("engine error: {0}")]
    Engine(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl GapError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            GapError::Environment(info)
            | GapError::Config(info)
            | GapError::Discovery(info)
            | GapError::Parse(info)
            | GapError::Io(info)
            | GapError::Engine(info)
            | GapError::Serde(info) => info,
        }
    }

    /// Process exit code reported by the `gap` binary for this error family.
    pub fn exit_code(&self) -> u8 {
        match self {
            GapError::Environment(_) => 2,
            GapError::Config(_) => 3,
            GapError::Discovery(_) => 4,
            GapError::Parse(_) => 5,
            GapError::Io(_) => 6,
            GapError::Engine(_) => 7,
            GapError::Serde(_) => 8,
        }
    }
}

/// Wraps a filesystem error into [`GapError::Io`] with the offending path attached.
pub fn io_error(code: &str, path: &std::path::Path, err: impl ToString) -> GapError {
    GapError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}
