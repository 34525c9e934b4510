//! Compile requests and preprocessor definitions.

use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};

/// Preprocessor definitions in command-line order.
///
/// Names are unique. Inserting an existing name replaces its value in place, so
/// the name keeps its original position on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    entries: Vec<(String, Option<String>)>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`, optionally with a value. Returns the previous value if
    /// the name was already defined.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove `name`, returning its value if it was defined.
    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render each definition as `NAME` or `NAME=VALUE`.
    pub fn flags(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(name, value)| match value {
            Some(value) => format!("{name}={value}"),
            None => name.to_string(),
        })
    }

    /// Parse `NAME` or `NAME=VALUE`.
    pub fn parse_one(raw: &str) -> Result<(String, Option<String>)> {
        let (name, value) = match raw.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.to_string())),
            None => (raw.trim(), None),
        };
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(CompileError::InvalidDefinition(raw.to_string()));
        }
        Ok((name.to_string(), value))
    }

    /// Parse a list of `NAME[=VALUE]` strings, later entries replacing earlier.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let mut defs = Self::new();
        for entry in raw {
            let (name, value) = Self::parse_one(entry.as_ref())?;
            defs.insert(name, value);
        }
        Ok(defs)
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut defs = Self::new();
        for (name, value) in iter {
            defs.insert(name, value);
        }
        defs
    }
}

/// Everything a backend needs to produce one executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Registry name of the backend to use.
    pub backend: String,
    /// Path of the executable to produce.
    pub artifact: PathBuf,
    /// Source entries, resolved against the work dir before compiling.
    pub sources: Vec<String>,
    pub includes: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub definitions: Definitions,
    /// Directory the compiler runs in and leaves intermediates in.
    pub work_dir: PathBuf,
}

impl BuildRequest {
    pub fn new(backend: impl Into<String>, artifact: &Path, work_dir: &Path) -> Self {
        Self {
            backend: backend.into(),
            artifact: artifact.to_path_buf(),
            sources: Vec::new(),
            includes: Vec::new(),
            libraries: Vec::new(),
            definitions: Definitions::new(),
            work_dir: work_dir.to_path_buf(),
        }
    }

    pub fn source(mut self, entry: impl Into<String>) -> Self {
        self.sources.push(entry.into());
        self
    }

    pub fn include(mut self, dir: impl Into<PathBuf>) -> Self {
        self.includes.push(dir.into());
        self
    }

    pub fn library(mut self, lib: impl Into<String>) -> Self {
        self.libraries.push(lib.into());
        self
    }

    pub fn define(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.definitions.insert(name, value.map(str::to_string));
        self
    }

    /// File name of the artifact, for log banners and archive entries.
    pub fn artifact_name(&self) -> String {
        self.artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.artifact.display().to_string())
    }
}
