//! platforge CLI: builds Sedona VMs for several platforms and packages
//! platform archives.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use platforge_build::Layout;

use config::Project;

#[derive(Parser)]
#[command(name = "platforge", version, about = "Multi-platform VM build orchestrator")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one or more targets defined in platforge.toml
    Build {
        /// Target to build (repeatable; default: all targets)
        #[arg(long = "target", value_name = "NAME")]
        targets: Vec<String>,
        /// Build every configured target
        #[arg(long, conflicts_with = "targets")]
        all: bool,
        /// Override the build version
        #[arg(long = "ver", value_name = "VERSION")]
        version: Option<String>,
        /// Compile against the IPv6 socket API
        #[arg(long)]
        ipv6: bool,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// Package a staged platform directory into a .par archive
    Archive {
        /// Staging directory (default: <home>/temp/.par)
        #[arg(long)]
        stage: Option<PathBuf>,
        /// Output archive (default: <stage>/out/<platformId>.par)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include the binary from <stage>/svm
        #[arg(long)]
        svm: bool,
        /// Register the archive with the platform database
        #[arg(long)]
        db: bool,
    },
    /// Show the contents of a .par archive
    Inspect {
        /// Archive file
        file: PathBuf,
    },
    /// Build the distribution bundle
    Dist {
        /// Override the bundle version
        #[arg(long = "ver", value_name = "VERSION")]
        version: Option<String>,
    },
    /// List compiler backends
    Backends,
    /// Inspect configured targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Remove staging directories
    Clean {
        /// Target to clean (repeatable; default: all targets)
        #[arg(long = "target", value_name = "NAME")]
        targets: Vec<String>,
    },
    /// Check toolchain and project status
    Doctor,
}

#[derive(Subcommand)]
enum TargetAction {
    /// List configured targets
    List,
    /// Show details of a target
    Describe {
        /// Target name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(logging::level(cli.verbose, cli.quiet));

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Build {
            targets,
            all,
            version,
            ipv6,
            report,
        } => {
            let project = Project::discover(&cwd)?;
            let targets = if all { Vec::new() } else { targets };
            commands::build::run(
                &project,
                &targets,
                version.as_deref(),
                ipv6,
                report.as_deref(),
            )
        }

        Commands::Archive {
            stage,
            output,
            svm,
            db,
        } => {
            let project = Project::discover_optional(&cwd)?;
            let layout = layout_or_cwd(project.as_ref(), &cwd);
            let tools = project.as_ref().map(|p| &p.config.tools);
            let stage = stage.unwrap_or_else(|| layout.default_archive_stage());
            commands::archive::run(&layout, tools, &stage, output.as_deref(), svm, db)
        }

        Commands::Inspect { file } => commands::inspect::run(&file),

        Commands::Dist { version } => {
            let project = Project::discover(&cwd)?;
            commands::dist::run(&project, version.as_deref())
        }

        Commands::Backends => commands::backends::run(),

        Commands::Target { action } => {
            let project = Project::discover(&cwd)?;
            match action {
                TargetAction::List => commands::target::list(&project),
                TargetAction::Describe { name } => commands::target::describe(&project, &name),
            }
        }

        Commands::Clean { targets } => {
            let project = Project::discover(&cwd)?;
            commands::clean::run(&project, &targets)
        }

        Commands::Doctor => commands::doctor::run(&cwd),
    }
}

/// The project's layout, or one rooted at `cwd` outside a project.
fn layout_or_cwd(project: Option<&Project>, cwd: &std::path::Path) -> Layout {
    match project {
        Some(project) => project.layout.clone(),
        None => Layout::new(cwd),
    }
}
