//! Error types for file synchronization.

use std::path::PathBuf;

use platforge_core::{Classify, FailureClass};

/// Errors that can occur while mirroring, removing, or zipping files.
#[derive(Debug, thiserror::Error)]
pub enum FsyncError {
    /// I/O failure on a specific path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An exclusion pattern is not a valid regular expression.
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The zip writer failed.
    #[error("zip error at {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

impl FsyncError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Classify for FsyncError {
    fn class(&self) -> FailureClass {
        match self {
            FsyncError::Pattern { .. } => FailureClass::Configuration,
            _ => FailureClass::Filesystem,
        }
    }
}

/// Result type for file synchronization operations.
pub type Result<T> = std::result::Result<T, FsyncError>;
