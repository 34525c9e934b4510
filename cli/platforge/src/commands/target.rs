//! `platforge target`: inspect configured targets.

use anyhow::{bail, Result};
use platforge_build::TargetSpec;
use platforge_platform::PlatformDescriptor;

use crate::config::Project;

/// List configured targets.
pub fn list(project: &Project) -> Result<()> {
    if project.config.targets.is_empty() {
        println!("No targets configured.");
        return Ok(());
    }
    println!("Configured targets:");
    println!();
    for target in &project.config.targets {
        println!(
            "  {:<20} {:<6} {}",
            target.name,
            target.backend,
            target.manifest.display()
        );
    }
    Ok(())
}

/// Show a target's resolved settings and its descriptor's validation issues.
pub fn describe(project: &Project, name: &str) -> Result<()> {
    let Some(target) = project.config.find_target(name) else {
        bail!(
            "unknown target: '{name}' (configured: {})",
            project.config.target_names().join(", ")
        );
    };
    let spec = project.target_spec(target)?;
    print!("{}", render(&spec));

    println!();
    println!("--- Descriptor ---");
    match PlatformDescriptor::load(&spec.manifest, &spec.staging) {
        Ok(descriptor) => {
            if let Some(id) = &descriptor.id {
                println!("  Id:     {id}");
            }
            if let Some(vendor) = &descriptor.vendor {
                println!("  Vendor: {vendor}");
            }
            let issues = descriptor.validate();
            if issues.is_empty() {
                println!("  OK");
            }
            for issue in issues {
                println!("  [{}] {}", issue.severity, issue.message);
            }
        }
        Err(e) => println!("  error: {e}"),
    }
    Ok(())
}

fn render(spec: &TargetSpec) -> String {
    let mut out = format!("=== Target: {} ===\n", spec.name);
    out.push_str(&format!("Backend:  {}\n", spec.backend));
    out.push_str(&format!("Manifest: {}\n", spec.manifest.display()));
    out.push_str(&format!("Staging:  {}\n", spec.staging.display()));
    out.push_str(&format!("Output:   {}\n", spec.output.display()));
    if let Some(installed) = &spec.installed {
        out.push_str(&format!("Install:  {}\n", installed.display()));
    }
    if !spec.sources.is_empty() {
        out.push_str(&format!("Sources:  {}\n", spec.sources.join(" ")));
    }
    if !spec.libraries.is_empty() {
        out.push_str(&format!("Libs:     {}\n", spec.libraries.join(" ")));
    }
    if !spec.definitions.is_empty() {
        let flags: Vec<String> = spec.definitions.flags().collect();
        out.push_str(&format!("Defines:  {}\n", flags.join(" ")));
    }
    if let Some(archive) = spec.archive {
        out.push_str(&format!(
            "Archive:  binary={} register={}\n",
            archive.include_binary, archive.register
        ));
    }
    out
}
