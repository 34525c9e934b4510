//! CLI command implementations.

pub mod archive;
pub mod backends;
pub mod build;
pub mod clean;
pub mod dist;
pub mod doctor;
pub mod inspect;
pub mod target;

use platforge_archive::{CommandRegistrar, LocalPlatformDb, Registrar};
use platforge_build::Layout;
use platforge_core::{SystemRunner, ToolRunner};
use std::time::Duration;

use crate::config::ToolsConfig;

pub(crate) fn system_runner(timeout: Option<Duration>) -> SystemRunner {
    match timeout {
        Some(timeout) => SystemRunner::with_timeout(timeout),
        None => SystemRunner::new(),
    }
}

/// The configured registration tool, or the home's platform db directory.
pub(crate) fn registrar<'a>(
    layout: &Layout,
    tools: Option<&ToolsConfig>,
    runner: &'a dyn ToolRunner,
) -> Box<dyn Registrar + 'a> {
    match tools.and_then(|t| t.registrar.as_ref().map(|r| (t, r))) {
        Some((tools, program)) => Box::new(CommandRegistrar::new(
            layout.resolve(program),
            tools.registrar_args.clone(),
            runner,
        )),
        None => Box::new(LocalPlatformDb::new(&layout.platform_db)),
    }
}
