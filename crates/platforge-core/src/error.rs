//! Error types for core operations.

use std::path::PathBuf;
use std::time::Duration;

use crate::failure::{Classify, FailureClass};

/// A platform identifier failed validation.
#[derive(Debug, thiserror::Error)]
pub enum PlatformIdError {
    #[error("platform id is empty")]
    Empty,

    #[error("platform id '{id}' has an empty component")]
    EmptyComponent { id: String },

    #[error("platform id '{id}' contains invalid component '{component}'")]
    InvalidComponent { id: String, component: String },
}

impl Classify for PlatformIdError {
    fn class(&self) -> FailureClass {
        FailureClass::Validation
    }
}

/// Errors raised while running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The program could not be started at all.
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed waiting on {}: {source}", program.display())]
    Wait {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The child outlived its deadline and was killed.
    #[error("{} timed out after {}s", program.display(), after.as_secs())]
    TimedOut { program: PathBuf, after: Duration },
}

impl Classify for ProcessError {
    fn class(&self) -> FailureClass {
        FailureClass::ExternalTool
    }
}
