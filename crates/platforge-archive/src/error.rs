//! Archive error types.

use std::path::PathBuf;

use platforge_core::{Classify, FailureClass, ProcessError, ToolStatus};
use platforge_fsync::FsyncError;
use platforge_platform::PlatformError;

/// Errors that can occur while packaging, reading or registering archives.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The staging directory has no platform manifest.
    #[error("could not find platform manifest: {}", path.display())]
    MissingManifest { path: PathBuf },

    /// The staging directory itself is missing.
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// The binary directory does not hold exactly one candidate.
    #[error("expected exactly one binary in {}, found {found}", dir.display())]
    BinaryCount { dir: PathBuf, found: usize },

    #[error(transparent)]
    Manifest(#[from] PlatformError),

    #[error(transparent)]
    Fsync(#[from] FsyncError),

    #[error("zip error in {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The registration tool exited non-zero.
    #[error("registration of {} failed: {status}", archive.display())]
    RegistrationFailed { archive: PathBuf, status: ToolStatus },

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        ArchiveError::Zip {
            path: path.into(),
            source,
        }
    }
}

impl Classify for ArchiveError {
    fn class(&self) -> FailureClass {
        match self {
            ArchiveError::MissingManifest { .. }
            | ArchiveError::NotADirectory { .. }
            | ArchiveError::BinaryCount { .. } => FailureClass::Validation,
            ArchiveError::Manifest(e) => e.class(),
            ArchiveError::Fsync(e) => e.class(),
            ArchiveError::Zip { .. } | ArchiveError::Io { .. } => FailureClass::Filesystem,
            ArchiveError::RegistrationFailed { .. } => FailureClass::ExternalTool,
            ArchiveError::Process(e) => e.class(),
        }
    }
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
