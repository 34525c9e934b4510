//! `platforge dist`: build the distribution bundle.

use anyhow::{bail, Result};
use platforge_archive::DistReport;

use crate::config::Project;

pub fn run(project: &Project, version: Option<&str>) -> Result<()> {
    let report = bundle(project, version)?;
    println!(
        "Success: {} ({} files, {})",
        report.archive.display(),
        report.files,
        report.copied_dirs.join(", ")
    );
    Ok(())
}

/// Stage and zip the bundle into the home directory.
pub fn bundle(project: &Project, version: Option<&str>) -> Result<DistReport> {
    let version = match version {
        Some(version) => version.to_string(),
        None => project.build_version()?,
    };
    if version.is_empty() {
        bail!("no build version: set project.version, buildVersion in lib/sedona.properties, or pass --ver");
    }
    let layout = &project.layout;
    let spec = project.dist_spec(&version);
    Ok(platforge_archive::dist(
        &layout.home,
        &layout.dist_stage(),
        &layout.home,
        &spec,
    )?)
}
