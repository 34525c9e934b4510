//! The backend trait and the registry backends are looked up in.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use platforge_core::{ToolInvocation, ToolRunner};

use crate::backends::{GccBackend, MsvcBackend, TccBackend};
use crate::error::{CompileError, Result};
use crate::request::BuildRequest;
use crate::toolchain::ToolchainEnv;

/// One compiler toolchain.
///
/// Object-safe so backends can be stored in `Box<dyn CompilerBackend>`.
pub trait CompilerBackend: fmt::Debug + Send + Sync {
    /// Registry name, as written in target configuration.
    fn name(&self) -> &str;

    /// One-line description for `platforge backends`.
    fn description(&self) -> &str;

    /// Verify the toolchain settings this backend needs. Runs no process.
    fn check(&self, env: &ToolchainEnv) -> Result<()>;

    /// Build the compiler command line for `request` over resolved `sources`.
    fn command(
        &self,
        request: &BuildRequest,
        sources: &[PathBuf],
        env: &ToolchainEnv,
    ) -> ToolInvocation;

    /// Remove intermediates left in `work_dir` by a successful compile.
    fn cleanup(&self, _work_dir: &Path) -> Result<()> {
        Ok(())
    }

    /// Run the compiler. A non-zero exit becomes [`CompileError::BuildFailure`].
    fn compile(
        &self,
        request: &BuildRequest,
        sources: &[PathBuf],
        env: &ToolchainEnv,
        runner: &dyn ToolRunner,
    ) -> Result<()> {
        if let Some(parent) = request.artifact.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CompileError::io(parent, e))?;
            }
        }

        let invocation = self.command(request, sources, env);
        log::info!("Compile [{}]", request.artifact_name());
        let status = runner.run(&invocation)?;
        if !status.success() {
            return Err(CompileError::BuildFailure {
                artifact: request.artifact.clone(),
                status,
            });
        }
        self.cleanup(&request.work_dir)
    }
}

/// Backends by name.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Box<dyn CompilerBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `msvc`, `tcc` and `gcc` backends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MsvcBackend));
        registry.register(Box::new(TccBackend));
        registry.register(Box::new(GccBackend));
        registry
    }

    /// Register a backend, replacing any backend with the same name.
    pub fn register(&mut self, backend: Box<dyn CompilerBackend>) {
        self.backends.insert(backend.name().to_string(), backend);
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Result<&dyn CompilerBackend> {
        self.backends
            .get(name)
            .map(|b| b.as_ref())
            .ok_or_else(|| CompileError::UnknownBackend {
                name: name.to_string(),
                known: self.names().into_iter().map(str::to_string).collect(),
            })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn CompilerBackend> {
        self.backends.values().map(|b| b.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platforge_core::{Classify, FailureClass, RecordingRunner};

    #[derive(Debug)]
    struct EchoBackend;

    impl CompilerBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "test backend"
        }

        fn check(&self, _env: &ToolchainEnv) -> Result<()> {
            Ok(())
        }

        fn command(
            &self,
            request: &BuildRequest,
            sources: &[PathBuf],
            _env: &ToolchainEnv,
        ) -> ToolInvocation {
            let mut inv = ToolInvocation::new("echo");
            for src in sources {
                inv = inv.path_arg(src);
            }
            inv.path_arg(&request.artifact)
        }
    }

    #[test]
    fn defaults_are_sorted() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["gcc", "msvc", "tcc"]);
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn unknown_backend_is_configuration_error() {
        let registry = BackendRegistry::with_defaults();
        let err = registry.get("clang").unwrap_err();
        assert_eq!(err.class(), FailureClass::Configuration);
        let msg = err.to_string();
        assert!(msg.contains("clang"));
        assert!(msg.contains("gcc, msvc, tcc"));
    }

    #[test]
    fn register_custom_backend() {
        let mut registry = BackendRegistry::new();
        registry.register(Box::new(EchoBackend));
        assert_eq!(registry.get("echo").unwrap().description(), "test backend");
    }

    #[test]
    fn compile_creates_output_dir_and_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("out/bin/svm");
        let request = BuildRequest::new("echo", &artifact, dir.path());
        let runner = RecordingRunner::succeeding();

        EchoBackend
            .compile(&request, &[], &ToolchainEnv::default(), &runner)
            .unwrap();
        assert!(dir.path().join("out/bin").is_dir());
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn non_zero_exit_is_build_failure() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("svm");
        let request = BuildRequest::new("echo", &artifact, dir.path());
        let runner = RecordingRunner::failing(2);

        let err = EchoBackend
            .compile(&request, &[], &ToolchainEnv::default(), &runner)
            .unwrap_err();
        match &err {
            CompileError::BuildFailure { artifact: a, status } => {
                assert_eq!(a, &artifact);
                assert_eq!(status.code, Some(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.class(), FailureClass::ExternalTool);
    }
}
