//! Microsoft Visual C++ (`cl.exe`).

use std::path::{Path, PathBuf};

use platforge_core::ToolInvocation;
use platforge_fsync::extension;

use crate::backend::CompilerBackend;
use crate::error::{CompileError, Result};
use crate::request::BuildRequest;
use crate::toolchain::ToolchainEnv;

/// Intermediate file extensions removed after a successful compile.
const INTERMEDIATES: &[&str] = &["obj", "tlh", "pdb"];

#[derive(Debug)]
pub struct MsvcBackend;

impl MsvcBackend {
    /// The SDK root: explicit, or `<vendor_root>/vc7/PlatformSDK`.
    fn sdk_root(env: &ToolchainEnv) -> Option<PathBuf> {
        env.sdk_root.clone().or_else(|| {
            env.vendor_root
                .as_ref()
                .map(|root| root.join("vc7").join("PlatformSDK"))
        })
    }
}

impl CompilerBackend for MsvcBackend {
    fn name(&self) -> &str {
        "msvc"
    }

    fn description(&self) -> &str {
        "Microsoft Visual C++ (cl), configured by VCINSTALLDIR and WIN_SDK"
    }

    fn check(&self, env: &ToolchainEnv) -> Result<()> {
        let vendor_root = env
            .vendor_root
            .as_ref()
            .ok_or(CompileError::ToolchainUnset {
                what: "Visual C++ install root",
                hint: "VCINSTALLDIR",
            })?;
        if !vendor_root.is_dir() {
            return Err(CompileError::ToolchainMissing {
                what: "Visual C++ install root",
                path: vendor_root.clone(),
            });
        }
        match Self::sdk_root(env) {
            Some(sdk) if sdk.is_dir() => Ok(()),
            Some(sdk) => Err(CompileError::ToolchainMissing {
                what: "Windows SDK",
                path: sdk,
            }),
            None => Err(CompileError::ToolchainUnset {
                what: "Windows SDK",
                hint: "WIN_SDK",
            }),
        }
    }

    fn command(
        &self,
        request: &BuildRequest,
        sources: &[PathBuf],
        env: &ToolchainEnv,
    ) -> ToolInvocation {
        let sdk = Self::sdk_root(env);
        let mut inv = ToolInvocation::new("cl").current_dir(&request.work_dir);

        if let Some(sdk) = &sdk {
            inv = inv.arg(format!("/I{}", sdk.join("Include").display()));
        }
        for include in &request.includes {
            inv = inv.arg(format!("/I{}", include.display()));
        }
        for flag in request.definitions.flags() {
            inv = inv.arg(format!("/D{flag}"));
        }
        for lib in &request.libraries {
            inv = match &sdk {
                Some(sdk) => inv.path_arg(&sdk.join("Lib").join(lib)),
                None => inv.arg(lib.as_str()),
            };
        }
        for src in sources {
            inv = inv.path_arg(src);
        }
        inv.arg("/nologo")
            .arg(format!("/Fe{}", request.artifact.display()))
    }

    fn cleanup(&self, work_dir: &Path) -> Result<()> {
        if !work_dir.is_dir() {
            return Ok(());
        }
        let entries = std::fs::read_dir(work_dir).map_err(|e| CompileError::io(work_dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| CompileError::io(work_dir, e))?.path();
            let ext = extension(&path).to_ascii_lowercase();
            if path.is_file() && INTERMEDIATES.contains(&ext.as_str()) {
                log::debug!("remove {}", path.display());
                std::fs::remove_file(&path).map_err(|e| CompileError::io(&path, e))?;
            }
        }
        Ok(())
    }
}
