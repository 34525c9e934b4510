//! Platform identifiers.
//!
//! A platform identifier is a dash-delimited key (`os-arch-variant`) that names
//! a platform uniquely across the platform database and the archive store.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformIdError;

/// Directory name that holds an installed archive inside the platform database.
pub const PAR_DIR: &str = ".par";

/// A validated platform identifier such as `linux-x86-generic`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformId(String);

impl PlatformId {
    /// Parse and validate an identifier.
    pub fn parse(id: &str) -> Result<Self, PlatformIdError> {
        if id.is_empty() {
            return Err(PlatformIdError::Empty);
        }
        for component in id.split('-') {
            if component.is_empty() {
                return Err(PlatformIdError::EmptyComponent { id: id.to_string() });
            }
            let bad_char = component
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control());
            if bad_char || component == "." || component == ".." {
                return Err(PlatformIdError::InvalidComponent {
                    id: id.to_string(),
                    component: component.to_string(),
                });
            }
        }
        Ok(PlatformId(id.to_string()))
    }

    /// The identifier as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dash-separated components, in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('-')
    }

    /// Directory inside a platform database where this platform's archive lives:
    /// `<db_root>/<c1>/<c2>/.../.par`.
    pub fn db_dir(&self, db_root: &Path) -> PathBuf {
        let mut dir = db_root.to_path_buf();
        for component in self.components() {
            dir.push(component);
        }
        dir.push(PAR_DIR);
        dir
    }

    /// Archive file name for this platform (`<id>.par`).
    pub fn archive_file_name(&self) -> String {
        format!("{}.par", self.0)
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlatformId {
    type Err = PlatformIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformId::parse(s)
    }
}

impl TryFrom<String> for PlatformId {
    type Error = PlatformIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PlatformId::parse(&value)
    }
}

impl From<PlatformId> for String {
    fn from(id: PlatformId) -> Self {
        id.0
    }
}
