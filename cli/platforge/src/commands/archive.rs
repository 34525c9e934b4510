//! `platforge archive`: package a staged `.par` directory.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use platforge_archive::{package, PackageOptions, PackageReport};
use platforge_build::Layout;
use platforge_core::ToolRunner;

use crate::config::ToolsConfig;

pub fn run(
    layout: &Layout,
    tools: Option<&ToolsConfig>,
    stage: &Path,
    output: Option<&Path>,
    svm: bool,
    db: bool,
) -> Result<()> {
    let timeout = tools.and_then(|t| t.timeout_secs).map(Duration::from_secs);
    let runner = super::system_runner(timeout);
    let report = archive(layout, tools, stage, output, svm, db, &runner)?;
    println!("Success: {}", report.archive.display());
    Ok(())
}

/// Package `stage` and optionally register the result.
pub fn archive(
    layout: &Layout,
    tools: Option<&ToolsConfig>,
    stage: &Path,
    output: Option<&Path>,
    svm: bool,
    db: bool,
    runner: &dyn ToolRunner,
) -> Result<PackageReport> {
    let options = PackageOptions {
        output: output.map(Path::to_path_buf),
        include_binary: svm,
        ..PackageOptions::default()
    };
    let report = package(stage, &options)?;
    if db {
        let registrar = super::registrar(layout, tools, runner);
        registrar.register(&report.archive, &report.platform_id)?;
    }
    Ok(report)
}
