//! Failure taxonomy shared by every component.

use std::fmt;

/// The class of a pipeline failure.
///
/// Every error type in the workspace maps onto exactly one class so that
/// callers can react uniformly (e.g. stop a multi-target loop) without
/// matching on crate-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Missing or invalid toolchain root, unknown backend name.
    /// Raised before any process is spawned.
    Configuration,
    /// Missing manifest, wrong root element, malformed identifier.
    /// Raised before any file is mutated.
    Validation,
    /// Non-zero exit (or timeout) of a generator, compiler, or registration tool.
    ExternalTool,
    /// Unreadable or unwritable path.
    Filesystem,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureClass::Configuration => "configuration error",
            FailureClass::Validation => "validation error",
            FailureClass::ExternalTool => "external tool failure",
            FailureClass::Filesystem => "filesystem error",
        };
        f.write_str(label)
    }
}

/// Errors that can report their [`FailureClass`].
pub trait Classify {
    /// The taxonomy class of this error.
    fn class(&self) -> FailureClass;
}
