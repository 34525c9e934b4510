//! `platforge doctor`: toolchain diagnostics.

use std::path::Path;

use anyhow::Result;
use platforge_compile::{BackendRegistry, ToolchainEnv};

use crate::config::Project;

/// Compilers each backend invokes, before the cross prefix.
const COMPILERS: &[(&str, &str)] = &[("gcc", "gcc"), ("msvc", "cl"), ("tcc", "tcc")];

/// Print toolchain diagnostic information.
pub fn run(cwd: &Path) -> Result<()> {
    println!("=== Platforge Doctor ===");
    println!();
    println!("Platforge version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let base = ToolchainEnv::from_env();
    let project = match Project::discover_optional(cwd) {
        Ok(project) => project,
        Err(e) => {
            println!("  platforge.toml: error: {e:#}");
            None
        }
    };
    let env = match &project {
        Some(project) => project.toolchain_env(base.clone()).unwrap_or(base),
        None => base,
    };

    println!("--- Compilers ---");
    for (backend, compiler) in COMPILERS {
        let program = env.tool(compiler);
        print_tool_status(&format!("{backend:<5}"), &program);
    }
    println!();

    println!("--- Backends ---");
    let registry = BackendRegistry::with_defaults();
    for backend in registry.iter() {
        match backend.check(&env) {
            Ok(()) => println!("  [OK]   {}", backend.name()),
            Err(e) => println!("  [FAIL] {}: {e}", backend.name()),
        }
    }
    println!();

    println!("--- Project Status ---");
    match &project {
        Some(project) => {
            println!("  platforge.toml: found at {}", project.root.display());
            println!("  Project: {}", project.config.project.name);
            println!("  Home:    {}", project.layout.home.display());
            match project.build_version() {
                Ok(version) if !version.is_empty() => println!("  Version: {version}"),
                Ok(_) => println!("  Version: (unset)"),
                Err(e) => println!("  Version: error: {e:#}"),
            }
            println!("  Targets: {}", project.config.targets.len());
            let generator = project.generator();
            let found = if generator.program.is_file() {
                "found"
            } else {
                "missing"
            };
            println!("  Generator: {} ({found})", generator.program.display());
        }
        None => println!("  platforge.toml: not found"),
    }

    Ok(())
}

fn print_tool_status(label: &str, program: &Path) {
    match which::which(program) {
        Ok(path) => println!("  [OK]   {label} {}", path.display()),
        Err(_) => println!("  [FAIL] {label} {} not found", program.display()),
    }
}
