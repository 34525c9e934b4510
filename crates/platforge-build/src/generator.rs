//! The external kit generator.

use std::path::{Path, PathBuf};

use platforge_core::{ToolInvocation, ToolRunner};

use crate::error::{BuildError, Result};

/// Runs `<program> <manifest> -outDir <staging> [args...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Generator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn invocation(&self, manifest: &Path, out_dir: &Path) -> ToolInvocation {
        ToolInvocation::new(&self.program)
            .path_arg(manifest)
            .arg("-outDir")
            .path_arg(out_dir)
            .args(self.args.iter().cloned())
    }

    /// Generate sources for `manifest` into `out_dir`.
    pub fn run(&self, manifest: &Path, out_dir: &Path, runner: &dyn ToolRunner) -> Result<()> {
        let invocation = self.invocation(manifest, out_dir);
        log::info!("Generate [{}]", manifest.display());
        let status = runner.run(&invocation)?;
        if !status.success() {
            return Err(BuildError::GeneratorFailed {
                manifest: manifest.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}
