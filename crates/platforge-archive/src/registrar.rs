//! Registering archives with a platform database.
//!
//! The `Registrar` trait abstracts over how an archive is installed:
//! `CommandRegistrar` delegates to an external tool, `LocalPlatformDb` copies
//! the archive into a database directory directly.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use platforge_core::{PlatformId, ToolInvocation, ToolRunner};

use crate::error::{ArchiveError, Result};

/// Installs a packaged archive into a platform database.
pub trait Registrar: fmt::Debug {
    /// Short name for log banners.
    fn name(&self) -> &str;

    /// Register `archive`, which holds platform `id`.
    fn register(&self, archive: &Path, id: &PlatformId) -> Result<()>;
}

/// Runs `<program> [args...] <archive>`. A non-zero exit is fatal.
pub struct CommandRegistrar<'a> {
    program: PathBuf,
    args: Vec<String>,
    runner: &'a dyn ToolRunner,
}

impl<'a> CommandRegistrar<'a> {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, runner: &'a dyn ToolRunner) -> Self {
        Self {
            program: program.into(),
            args,
            runner,
        }
    }

    /// The command that would register `archive`.
    pub fn invocation(&self, archive: &Path) -> ToolInvocation {
        ToolInvocation::new(&self.program)
            .args(self.args.iter().cloned())
            .path_arg(archive)
    }
}

impl fmt::Debug for CommandRegistrar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistrar")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish()
    }
}

impl Registrar for CommandRegistrar<'_> {
    fn name(&self) -> &str {
        "command"
    }

    fn register(&self, archive: &Path, id: &PlatformId) -> Result<()> {
        let invocation = self.invocation(archive);
        log::info!("Register [{id}] {invocation}");
        let status = self.runner.run(&invocation)?;
        if !status.success() {
            return Err(ArchiveError::RegistrationFailed {
                archive: archive.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}

/// A platform database on the local filesystem.
///
/// Layout:
/// ```text
/// <root>/
///   <tok1>/<tok2>/.../
///     .par/
///       <platformId>.par
/// ```
#[derive(Debug, Clone)]
pub struct LocalPlatformDb {
    root: PathBuf,
}

impl LocalPlatformDb {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the archive for `id` lives once installed.
    pub fn archive_path(&self, id: &PlatformId) -> PathBuf {
        id.db_dir(&self.root).join(id.archive_file_name())
    }

    /// Whether an archive for `id` is installed.
    pub fn contains(&self, id: &PlatformId) -> bool {
        self.archive_path(id).is_file()
    }
}

impl Registrar for LocalPlatformDb {
    fn name(&self) -> &str {
        "local"
    }

    fn register(&self, archive: &Path, id: &PlatformId) -> Result<()> {
        let dest = self.archive_path(id);
        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir).map_err(|e| ArchiveError::io(dir, e))?;
        }
        log::info!("Register [{id}] {}", dest.display());
        fs::copy(archive, &dest).map_err(|e| ArchiveError::io(&dest, e))?;
        Ok(())
    }
}
