//! Well-known paths under a Sedona home directory.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::props;

/// Home-relative paths, computed once and passed to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub home: PathBuf,
    pub adm: PathBuf,
    pub bin: PathBuf,
    pub lib: PathBuf,
    pub temp: PathBuf,
    pub build: PathBuf,
    pub platforms: PathBuf,
    /// Local platform database, `platforms/db`.
    pub platform_db: PathBuf,
}

impl Layout {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let platforms = home.join("platforms");
        Self {
            adm: home.join("adm"),
            bin: home.join("bin"),
            lib: home.join("lib"),
            temp: home.join("temp"),
            build: home.join("build"),
            platform_db: platforms.join("db"),
            platforms,
            home,
        }
    }

    /// Resolve a path from configuration. Relative paths are taken from home.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.home.join(path)
    }

    /// The kit generator shipped in `bin/`.
    pub fn default_generator(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin.join("sedonac.exe")
        } else {
            self.bin.join("sedonac.sh")
        }
    }

    /// The platform database tool shipped in `adm/`.
    pub fn default_registrar(&self) -> PathBuf {
        self.adm.join("platformdb.py")
    }

    /// Where `platforge archive` looks for a staged archive by default.
    pub fn default_archive_stage(&self) -> PathBuf {
        self.temp.join(platforge_core::platform_id::PAR_DIR)
    }

    /// Scratch directory for distribution bundles.
    pub fn dist_stage(&self) -> PathBuf {
        self.build.join("stage")
    }

    pub fn properties_file(&self) -> PathBuf {
        self.lib.join("sedona.properties")
    }

    /// `buildVersion` from `lib/sedona.properties`, if the file sets it.
    pub fn build_version(&self) -> Result<Option<String>> {
        let path = self.properties_file();
        if !path.is_file() {
            return Ok(None);
        }
        Ok(props::load(&path)?.remove("buildVersion"))
    }
}
