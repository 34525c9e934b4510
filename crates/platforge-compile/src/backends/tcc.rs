//! Tiny C Compiler (`tcc`).

use std::path::PathBuf;

use platforge_core::ToolInvocation;

use crate::backend::CompilerBackend;
use crate::error::Result;
use crate::request::BuildRequest;
use crate::toolchain::ToolchainEnv;

#[derive(Debug)]
pub struct TccBackend;

/// Turn a library reference such as `libm.a` or `ws2_32.lib` into the bare
/// name given to `-l`.
fn link_name(lib: &str) -> &str {
    let base = lib
        .strip_suffix(".lib")
        .or_else(|| lib.strip_suffix(".a"))
        .unwrap_or(lib);
    match base.strip_prefix("lib") {
        Some(rest) if !rest.is_empty() && base.len() != lib.len() => rest,
        _ => base,
    }
}

impl CompilerBackend for TccBackend {
    fn name(&self) -> &str {
        "tcc"
    }

    fn description(&self) -> &str {
        "Tiny C Compiler, honours CROSS_COMPILE, CFLAGS and LDFLAGS"
    }

    fn check(&self, _env: &ToolchainEnv) -> Result<()> {
        Ok(())
    }

    fn command(
        &self,
        request: &BuildRequest,
        sources: &[PathBuf],
        env: &ToolchainEnv,
    ) -> ToolInvocation {
        let mut inv = ToolInvocation::new(env.tool("tcc")).current_dir(&request.work_dir);
        for include in &request.includes {
            inv = inv.arg(format!("-I{}", include.display()));
        }
        for flag in request.definitions.flags() {
            inv = inv.arg(format!("-D{flag}"));
        }
        for src in sources {
            inv = inv.path_arg(src);
        }
        inv = inv.args(env.cflags.iter().cloned());
        for lib in &request.libraries {
            inv = inv.arg(format!("-l{}", link_name(lib)));
        }
        inv.args(env.ldflags.iter().cloned())
            .arg("-o")
            .path_arg(&request.artifact)
    }
}
