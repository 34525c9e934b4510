//! Build pipeline errors.

use std::path::PathBuf;

use platforge_archive::ArchiveError;
use platforge_compile::CompileError;
use platforge_core::{Classify, FailureClass, ProcessError, ToolStatus};
use platforge_fsync::FsyncError;
use platforge_platform::PlatformError;

use crate::pipeline::Step;

/// Errors that can occur inside one pipeline step.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Fsync(#[from] FsyncError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The kit generator exited non-zero.
    #[error("generator failed for {}: {status}", manifest.display())]
    GeneratorFailed { manifest: PathBuf, status: ToolStatus },

    /// Registration was requested but no registrar is configured.
    #[error("target '{target}' requests registration but no registrar is configured")]
    NoRegistrar { target: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

impl Classify for BuildError {
    fn class(&self) -> FailureClass {
        match self {
            BuildError::Platform(e) => e.class(),
            BuildError::Compile(e) => e.class(),
            BuildError::Fsync(e) => e.class(),
            BuildError::Archive(e) => e.class(),
            BuildError::Process(e) => e.class(),
            BuildError::GeneratorFailed { .. } => FailureClass::ExternalTool,
            BuildError::NoRegistrar { .. } => FailureClass::Configuration,
            BuildError::Io { .. } => FailureClass::Filesystem,
        }
    }
}

/// A pipeline failure, tagged with the target, its artifact and the step
/// that failed.
#[derive(Debug, thiserror::Error)]
#[error("target '{target}' failed at {step}: {source}")]
pub struct TargetError {
    pub target: String,
    /// The executable the target was producing.
    pub artifact: PathBuf,
    pub step: Step,
    #[source]
    pub source: BuildError,
}

impl Classify for TargetError {
    fn class(&self) -> FailureClass {
        self.source.class()
    }
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
