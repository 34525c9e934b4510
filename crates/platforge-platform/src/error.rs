//! Error types for platform documents.

use std::path::PathBuf;

use platforge_core::{Classify, FailureClass, PlatformIdError};

/// Errors that can occur while loading a descriptor or manifest.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The document does not exist.
    #[error("platform document not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The document exists but could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        source: roxmltree::Error,
    },

    /// The root element is not the one this call site requires.
    #[error("{}: expected root element <{expected}>, found <{found}>", path.display())]
    WrongRoot {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },

    /// A required attribute is absent.
    #[error("{}: <{element}> is missing required attribute '{attribute}'", path.display())]
    MissingAttribute {
        path: PathBuf,
        element: String,
        attribute: &'static str,
    },

    /// An attribute value does not parse.
    #[error("{}: attribute '{attribute}' has invalid value '{value}'", path.display())]
    InvalidAttribute {
        path: PathBuf,
        attribute: &'static str,
        value: String,
    },

    /// The platform identifier is malformed.
    #[error("invalid platform id: {0}")]
    Id(#[from] PlatformIdError),
}

impl Classify for PlatformError {
    fn class(&self) -> FailureClass {
        match self {
            PlatformError::Io { .. } => FailureClass::Filesystem,
            _ => FailureClass::Validation,
        }
    }
}

/// Result type for platform document operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
