//! Exclusion pattern sets.

use std::ffi::OsStr;

use regex::Regex;

use crate::error::{FsyncError, Result};

/// How an exclusion pattern is anchored against an entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The pattern must match the whole name (`^(?:p)$`).
    #[default]
    FullName,
    /// The pattern must match at the start of the name (`^(?:p)`), so `build`
    /// also excludes `build.xml` and `builder`.
    Prefix,
}

/// An ordered set of compiled exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    mode: MatchMode,
    sources: Vec<String>,
    compiled: Vec<Regex>,
}

impl ExcludeSet {
    /// A set that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile `patterns` with full-name matching.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_mode(patterns, MatchMode::FullName)
    }

    /// Compile `patterns` with prefix matching.
    pub fn prefix<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_mode(patterns, MatchMode::Prefix)
    }

    pub fn with_mode<I, S>(patterns: I, mode: MatchMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sources = Vec::new();
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let anchored = match mode {
                MatchMode::FullName => format!("^(?:{pattern})$"),
                MatchMode::Prefix => format!("^(?:{pattern})"),
            };
            let regex = Regex::new(&anchored).map_err(|source| FsyncError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            sources.push(pattern.to_string());
            compiled.push(regex);
        }
        Ok(Self {
            mode,
            sources,
            compiled,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The patterns as given, before anchoring.
    pub fn patterns(&self) -> &[String] {
        &self.sources
    }

    /// Whether a bare entry name is excluded.
    pub fn matches(&self, name: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(name))
    }

    /// [`matches`](Self::matches) for an OS file name.
    pub fn matches_os(&self, name: &OsStr) -> bool {
        !self.is_empty() && self.matches(&name.to_string_lossy())
    }
}
