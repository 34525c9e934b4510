//! GNU C compiler (`gcc`), native or cross.

use std::path::PathBuf;

use platforge_core::ToolInvocation;

use crate::backend::CompilerBackend;
use crate::error::{CompileError, Result};
use crate::request::BuildRequest;
use crate::toolchain::ToolchainEnv;

#[derive(Debug)]
pub struct GccBackend;

impl CompilerBackend for GccBackend {
    fn name(&self) -> &str {
        "gcc"
    }

    fn description(&self) -> &str {
        "GNU C compiler, 32-bit on x86_64 hosts, honours CROSS_COMPILE and SYSROOT"
    }

    fn check(&self, env: &ToolchainEnv) -> Result<()> {
        match &env.sysroot {
            Some(sysroot) if !sysroot.is_dir() => Err(CompileError::ToolchainMissing {
                what: "sysroot",
                path: sysroot.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn command(
        &self,
        request: &BuildRequest,
        sources: &[PathBuf],
        env: &ToolchainEnv,
    ) -> ToolInvocation {
        let mut inv = ToolInvocation::new(env.tool("gcc")).current_dir(&request.work_dir);
        // The VM is 32-bit; native builds on 64-bit x86 need -m32.
        if env.host_arch == "x86_64" && !env.is_cross() {
            inv = inv.arg("-m32");
        }
        if let Some(sysroot) = &env.sysroot {
            inv = inv.arg(format!("--sysroot={}", sysroot.display()));
        }
        for include in &request.includes {
            inv = inv.arg(format!("-I{}", include.display()));
        }
        for flag in request.definitions.flags() {
            inv = inv.arg(format!("-D{flag}"));
        }
        inv = inv.arg(format!("-DPLAT_BUILD_VERSION=\"{}\"", env.build_version));
        for src in sources {
            inv = inv.path_arg(src);
        }
        for lib in &request.libraries {
            inv = inv.arg(format!("-l{lib}"));
        }
        inv.args(env.cflags.iter().cloned())
            .arg("-O2")
            .args(env.ldflags.iter().cloned())
            .arg("-o")
            .path_arg(&request.artifact)
    }
}
