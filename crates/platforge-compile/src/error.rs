//! Error types for compilation.

use std::path::PathBuf;

use platforge_core::{Classify, FailureClass, ProcessError, ToolStatus};

/// Errors that can occur while resolving a backend or compiling.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// No backend is registered under this name.
    #[error("unknown backend '{name}' (known: {})", known.join(", "))]
    UnknownBackend { name: String, known: Vec<String> },

    /// A required toolchain setting is absent.
    #[error("{what} is not configured (set {hint})")]
    ToolchainUnset {
        what: &'static str,
        hint: &'static str,
    },

    /// A configured toolchain directory does not exist.
    #[error("{what} not found: {}", path.display())]
    ToolchainMissing { what: &'static str, path: PathBuf },

    /// A definition string could not be parsed.
    #[error("invalid definition '{0}' (expected NAME or NAME=VALUE)")]
    InvalidDefinition(String),

    /// A wildcard source entry could not be turned into a pattern.
    #[error("invalid source pattern '{pattern}': {source}")]
    SourcePattern {
        pattern: String,
        source: regex::Error,
    },

    /// A wildcard source entry matched nothing.
    #[error("no sources match '{pattern}' in {}", dir.display())]
    NoSources { pattern: String, dir: PathBuf },

    /// The compiler ran and exited non-zero.
    #[error("compile of {} failed: {status}", artifact.display())]
    BuildFailure { artifact: PathBuf, status: ToolStatus },

    /// The compiler could not be run at all.
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }
}

impl Classify for CompileError {
    fn class(&self) -> FailureClass {
        match self {
            CompileError::UnknownBackend { .. }
            | CompileError::ToolchainUnset { .. }
            | CompileError::ToolchainMissing { .. }
            | CompileError::InvalidDefinition(_)
            | CompileError::SourcePattern { .. } => FailureClass::Configuration,
            CompileError::NoSources { .. } => FailureClass::Validation,
            CompileError::BuildFailure { .. } => FailureClass::ExternalTool,
            CompileError::Process(e) => e.class(),
            CompileError::Io { .. } => FailureClass::Filesystem,
        }
    }
}

/// Result type for compile operations.
pub type Result<T> = std::result::Result<T, CompileError>;
