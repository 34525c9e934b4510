//! The per-target build pipeline.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

use platforge_archive::{package, PackageOptions, Registrar, SVM_DIR};
use platforge_compile::{resolve_sources, BackendRegistry, ToolchainEnv};
use platforge_core::ToolRunner;
use platforge_fsync::{copy_file, remove_tree, ExcludeSet};
use platforge_platform::PlatformDescriptor;
use serde::Serialize;

use crate::error::{BuildError, Result, TargetError};
use crate::generator::Generator;
use crate::report::{BuildReport, StepTiming};
use crate::target::{BuildOptions, TargetSpec};

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Resolve,
    Clean,
    Generate,
    Compile,
    Publish,
    Package,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Resolve => "resolve",
            Step::Clean => "clean",
            Step::Generate => "generate",
            Step::Compile => "compile",
            Step::Publish => "publish",
            Step::Package => "package",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Runs steps in order, timing each and tagging failures with the step.
struct StepRunner<'t> {
    target: &'t TargetSpec,
    timings: Vec<StepTiming>,
}

impl StepRunner<'_> {
    fn run<T>(
        &mut self,
        step: Step,
        f: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, TargetError> {
        log::debug!("[{}] {step}", self.target.name);
        let started = Instant::now();
        let result = f();
        self.timings.push(StepTiming {
            step,
            duration_ms: started.elapsed().as_millis() as u64,
        });
        result.map_err(|source| TargetError {
            target: self.target.name.clone(),
            artifact: self.target.output.clone(),
            step,
            source,
        })
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| BuildError::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Copy `src` over `dest` (creating its directory) and mark it executable.
fn publish_binary(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
    }
    copy_file(src, dest, true)?;
    make_executable(dest)
}

/// Remove a target's staging directory.
pub fn clean_target(target: &TargetSpec) -> Result<()> {
    log::info!("Clean [{}]", target.staging.display());
    remove_tree(&target.staging, &ExcludeSet::empty())?;
    Ok(())
}

/// Drives targets through the pipeline.
///
/// Holds only shared, immutable collaborators; one orchestrator can build any
/// number of targets in sequence.
pub struct Orchestrator<'a> {
    registry: &'a BackendRegistry,
    env: &'a ToolchainEnv,
    generator: &'a Generator,
    runner: &'a dyn ToolRunner,
    registrar: Option<&'a dyn Registrar>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        registry: &'a BackendRegistry,
        env: &'a ToolchainEnv,
        generator: &'a Generator,
        runner: &'a dyn ToolRunner,
    ) -> Self {
        Self {
            registry,
            env,
            generator,
            runner,
            registrar: None,
        }
    }

    /// Register archives of targets that ask for it through `registrar`.
    pub fn with_registrar(mut self, registrar: &'a dyn Registrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Build one target.
    ///
    /// Resolve touches nothing on disk and spawns nothing, so configuration
    /// and descriptor problems surface before the staging dir is wiped.
    pub fn build_target(
        &self,
        target: &TargetSpec,
        options: &BuildOptions,
    ) -> std::result::Result<BuildReport, TargetError> {
        let started = Instant::now();
        let mut steps = StepRunner {
            target,
            timings: Vec::new(),
        };
        let env = match &options.version {
            Some(version) => self.env.with_build_version(version.as_str()),
            None => self.env.clone(),
        };

        let (descriptor, backend) = steps.run(Step::Resolve, || {
            let descriptor = PlatformDescriptor::load(&target.manifest, &target.staging)?;
            let backend = self.registry.get(&target.backend)?;
            backend.check(&env)?;
            if target.archive.is_some_and(|a| a.register) && self.registrar.is_none() {
                return Err(BuildError::NoRegistrar {
                    target: target.name.clone(),
                });
            }
            Ok((descriptor, backend))
        })?;

        steps.run(Step::Clean, || clean_target(target))?;

        steps.run(Step::Generate, || {
            self.generator
                .run(&target.manifest, &target.staging, self.runner)
        })?;

        let request = target.request(options);
        let sources = steps.run(Step::Compile, || {
            let sources = resolve_sources(&request.work_dir, &request.sources)?;
            backend.compile(&request, &sources, &env, self.runner)?;
            Ok(sources.len())
        })?;

        steps.run(Step::Publish, || {
            if let Some(installed) = &target.installed {
                publish_binary(&target.output, installed)?;
            }
            if target.archive.is_some() {
                let staged = target.par_dir().join(SVM_DIR).join(target.output_name());
                publish_binary(&target.output, &staged)?;
            }
            Ok(())
        })?;

        let mut archive = None;
        if let Some(archive_options) = target.archive {
            let report = steps.run(Step::Package, || {
                let options = PackageOptions {
                    output: None,
                    include_binary: archive_options.include_binary,
                    binary_policy: archive_options.binary_policy,
                };
                let report = package(&target.par_dir(), &options)?;
                if archive_options.register {
                    if let Some(registrar) = self.registrar {
                        registrar.register(&report.archive, &report.platform_id)?;
                    }
                }
                Ok(report)
            })?;
            archive = Some(report);
        }

        let platform_id = archive
            .as_ref()
            .map(|a| a.platform_id.to_string())
            .or_else(|| descriptor.platform_id().map(|id| id.to_string()));

        Ok(BuildReport {
            target: target.name.clone(),
            platform_id,
            backend: backend.name().to_string(),
            build_version: env.build_version.clone(),
            sources,
            artifact: target.output.clone(),
            installed: target.installed.clone(),
            archive,
            steps: steps.timings,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
