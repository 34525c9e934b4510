//! `platforge build`: run targets through the build pipeline.

use anyhow::{bail, Context, Result};
use platforge_build::{BuildOptions, BuildReport, Orchestrator, SocketFamily};
use platforge_compile::{BackendRegistry, ToolchainEnv};
use platforge_core::ToolRunner;

use crate::config::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Human,
    Json,
}

impl ReportFormat {
    fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("human") => Ok(ReportFormat::Human),
            Some("json") => Ok(ReportFormat::Json),
            Some(other) => bail!("unknown report format: '{other}' (expected human or json)"),
        }
    }
}

/// Build the named targets (all targets when `targets` is empty).
pub fn run(
    project: &Project,
    targets: &[String],
    version: Option<&str>,
    ipv6: bool,
    report: Option<&str>,
) -> Result<()> {
    let format = ReportFormat::parse(report)?;
    let options = BuildOptions {
        version: version.map(str::to_string),
        socket_family: ipv6.then_some(SocketFamily::Inet6),
    };
    let runner = super::system_runner(project.timeout());
    let reports = build_targets(project, targets, &options, ToolchainEnv::from_env(), &runner)?;

    match format {
        ReportFormat::Human => {
            for report in &reports {
                println!("{report}");
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&reports).context("serializing reports")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Build targets in order, stopping at the first failure.
pub fn build_targets(
    project: &Project,
    targets: &[String],
    options: &BuildOptions,
    base_env: ToolchainEnv,
    runner: &dyn ToolRunner,
) -> Result<Vec<BuildReport>> {
    let specs = project.select_targets(targets)?;
    if specs.is_empty() {
        bail!("no targets configured in {}", crate::config::CONFIG_FILE);
    }

    let registry = BackendRegistry::with_defaults();
    let env = project.toolchain_env(base_env)?;
    let generator = project.generator();
    let registrar = super::registrar(&project.layout, Some(&project.config.tools), runner);
    let orchestrator =
        Orchestrator::new(&registry, &env, &generator, runner).with_registrar(registrar.as_ref());

    let mut reports = Vec::with_capacity(specs.len());
    for spec in &specs {
        match orchestrator.build_target(spec, options) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("**");
                eprintln!("** FAILED [{}]", e.artifact.display());
                eprintln!("**");
                return Err(e.into());
            }
        }
    }
    Ok(reports)
}
