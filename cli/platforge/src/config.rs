//! `platforge.toml` parsing and project configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use platforge_archive::{BinaryPolicy, DistEntry, DistSpec};
use platforge_build::{ArchiveOptions, Generator, Layout, TargetSpec};
use platforge_compile::{Definitions, ToolchainEnv};
use platforge_fsync::MatchMode;
use serde::Deserialize;

/// File name searched for, upward from the working directory.
pub const CONFIG_FILE: &str = "platforge.toml";

/// The top-level configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatforgeConfig {
    /// Project metadata (required).
    pub project: ProjectConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Overrides of the environment-derived toolchain settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub dist: Option<DistConfig>,
}

/// Project metadata section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Sedona home, relative to the config file.
    #[serde(default = "default_home")]
    pub home: PathBuf,
    /// Build version; falls back to `lib/sedona.properties`.
    #[serde(default)]
    pub version: Option<String>,
}

fn default_home() -> PathBuf {
    PathBuf::from(".")
}

/// External tools section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsConfig {
    /// Kit generator; defaults to the one in `bin/`.
    #[serde(default)]
    pub generator: Option<PathBuf>,
    #[serde(default)]
    pub generator_args: Vec<String>,
    /// Registration tool. Without one, archives are copied into
    /// `platforms/db` directly.
    #[serde(default)]
    pub registrar: Option<PathBuf>,
    #[serde(default)]
    pub registrar_args: Vec<String>,
    /// Kill any external tool that runs longer than this.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Toolchain override section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default)]
    pub vendor_root: Option<PathBuf>,
    #[serde(default)]
    pub sdk_root: Option<PathBuf>,
    #[serde(default)]
    pub cross_prefix: Option<String>,
    #[serde(default)]
    pub sysroot: Option<PathBuf>,
    #[serde(default)]
    pub cflags: Option<Vec<String>>,
    #[serde(default)]
    pub ldflags: Option<Vec<String>>,
}

/// One `[[target]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    /// Platform descriptor, relative to home.
    pub manifest: PathBuf,
    pub backend: String,
    /// Staging directory, relative to home.
    pub staging: PathBuf,
    /// Compiled executable, relative to home.
    pub output: PathBuf,
    /// Publish location, relative to home.
    #[serde(default)]
    pub installed: Option<PathBuf>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub includes: Vec<PathBuf>,
    #[serde(default)]
    pub libraries: Vec<String>,
    /// `NAME` or `NAME=VALUE`, in command-line order.
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub archive: Option<ArchiveConfig>,
}

/// Inline `archive = { ... }` table of a target.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub include_binary: bool,
    #[serde(default)]
    pub register: bool,
    #[serde(default)]
    pub binary_policy: BinaryPolicy,
}

/// Exclusion matching mode in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfig {
    #[default]
    Full,
    Prefix,
}

/// `[dist]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DistConfig {
    #[serde(default = "default_dist_name")]
    pub name: String,
    #[serde(default)]
    pub match_mode: MatchConfig,
    /// Replaces the standard copy list when present.
    #[serde(default)]
    pub copy: Option<Vec<DistCopyConfig>>,
}

fn default_dist_name() -> String {
    "sedona_community".to_string()
}

/// One `[[dist.copy]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DistCopyConfig {
    pub dir: String,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl PlatforgeConfig {
    /// Search upward from `start_dir` for a `platforge.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: PlatforgeConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a configuration from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing platforge.toml")
    }

    pub fn find_target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}

/// A loaded configuration together with the paths derived from it.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: PlatforgeConfig,
    /// Directory holding `platforge.toml`.
    pub root: PathBuf,
    pub layout: Layout,
}

impl Project {
    pub fn new(config: PlatforgeConfig, root: PathBuf) -> Self {
        let layout = Layout::new(root.join(&config.project.home));
        Self {
            config,
            root,
            layout,
        }
    }

    /// Load the project containing `cwd`, if any.
    pub fn discover_optional(cwd: &Path) -> Result<Option<Self>> {
        Ok(PlatforgeConfig::find_and_load(cwd)?.map(|(config, root)| Self::new(config, root)))
    }

    /// Load the project containing `cwd`, failing if there is none.
    pub fn discover(cwd: &Path) -> Result<Self> {
        match Self::discover_optional(cwd)? {
            Some(project) => Ok(project),
            None => bail!(
                "no {CONFIG_FILE} found in {} or any parent directory",
                cwd.display()
            ),
        }
    }

    /// Build version: configured, else `buildVersion` from the home's
    /// properties, else empty.
    pub fn build_version(&self) -> Result<String> {
        if let Some(version) = &self.config.project.version {
            return Ok(version.clone());
        }
        Ok(self.layout.build_version()?.unwrap_or_default())
    }

    /// Toolchain settings: `base` (usually the process environment) with the
    /// `[toolchain]` overrides applied.
    pub fn toolchain_env(&self, base: ToolchainEnv) -> Result<ToolchainEnv> {
        let overrides = &self.config.toolchain;
        let mut env = base;
        if let Some(root) = &overrides.vendor_root {
            env.vendor_root = Some(self.layout.resolve(root));
        }
        if let Some(root) = &overrides.sdk_root {
            env.sdk_root = Some(self.layout.resolve(root));
        }
        if let Some(prefix) = &overrides.cross_prefix {
            env.cross_prefix = prefix.clone();
        }
        if let Some(sysroot) = &overrides.sysroot {
            env.sysroot = Some(self.layout.resolve(sysroot));
        }
        if let Some(cflags) = &overrides.cflags {
            env.cflags = cflags.clone();
        }
        if let Some(ldflags) = &overrides.ldflags {
            env.ldflags = ldflags.clone();
        }
        env.build_version = self.build_version()?;
        Ok(env)
    }

    pub fn generator(&self) -> Generator {
        let tools = &self.config.tools;
        let program = match &tools.generator {
            Some(path) => self.layout.resolve(path),
            None => self.layout.default_generator(),
        };
        Generator::new(program).with_args(tools.generator_args.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.tools.timeout_secs.map(Duration::from_secs)
    }

    /// Resolve a `[[target]]` entry into a buildable spec.
    pub fn target_spec(&self, target: &TargetConfig) -> Result<TargetSpec> {
        let layout = &self.layout;
        let definitions = Definitions::parse_all(&target.definitions)
            .with_context(|| format!("target '{}'", target.name))?;
        Ok(TargetSpec {
            name: target.name.clone(),
            manifest: layout.resolve(&target.manifest),
            staging: layout.resolve(&target.staging),
            backend: target.backend.clone(),
            output: layout.resolve(&target.output),
            sources: target.sources.clone(),
            includes: target.includes.iter().map(|p| layout.resolve(p)).collect(),
            libraries: target.libraries.clone(),
            definitions,
            installed: target.installed.as_ref().map(|p| layout.resolve(p)),
            archive: target.archive.map(|a| ArchiveOptions {
                include_binary: a.include_binary,
                register: a.register,
                binary_policy: a.binary_policy,
            }),
        })
    }

    /// Specs for the named targets, or for every target when `names` is empty.
    pub fn select_targets(&self, names: &[String]) -> Result<Vec<TargetSpec>> {
        if names.is_empty() {
            return self
                .config
                .targets
                .iter()
                .map(|t| self.target_spec(t))
                .collect();
        }
        names
            .iter()
            .map(|name| match self.config.find_target(name) {
                Some(t) => self.target_spec(t),
                None => bail!(
                    "unknown target: '{name}' (configured: {})",
                    self.config.target_names().join(", ")
                ),
            })
            .collect()
    }

    /// The distribution bundle description for `version`.
    pub fn dist_spec(&self, version: &str) -> DistSpec {
        let Some(dist) = &self.config.dist else {
            return DistSpec::standard(default_dist_name(), version);
        };
        let mut spec = DistSpec::standard(dist.name.clone(), version);
        if let Some(copy) = &dist.copy {
            spec.entries = copy
                .iter()
                .map(|c| DistEntry {
                    dir: c.dir.clone(),
                    excludes: c.excludes.clone(),
                })
                .collect();
        }
        spec.match_mode = match dist.match_mode {
            MatchConfig::Full => MatchMode::FullName,
            MatchConfig::Prefix => MatchMode::Prefix,
        };
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[project]
name = "sedona"
version = "1.2.28"

[tools]
generator = "bin/sedonac.sh"
registrar = "adm/platformdb.py"
registrar_args = ["-i"]
timeout_secs = 600

[toolchain]
cross_prefix = "arm-linux-gnueabi-"
cflags = ["-Wall"]

[[target]]
name = "unix"
manifest = "platforms/src/generic/unix/generic-unix.xml"
backend = "gcc"
staging = "temp/unix"
output = "platforms/src/generic/unix/svm"
installed = "bin/svm"
sources = ["*.c"]
libraries = ["pthread"]
definitions = ["__UNIX__=1", "SOCKET_FAMILY_INET"]
archive = { include_binary = true, register = true }

[[target]]
name = "win32"
manifest = "platforms/src/generic/win32/generic-win32.xml"
backend = "msvc"
staging = "temp/win32"
output = "platforms/src/generic/win32/svm.exe"
"#;

    fn project() -> Project {
        Project::new(
            PlatforgeConfig::from_str(SAMPLE).unwrap(),
            PathBuf::from("/home/sedona"),
        )
    }

    #[test]
    fn parse_sample() {
        let config = PlatforgeConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.project.name, "sedona");
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.target_names(), vec!["unix", "win32"]);
        assert_eq!(config.tools.timeout_secs, Some(600));
        let archive = config.targets[0].archive.unwrap();
        assert!(archive.include_binary && archive.register);
        assert_eq!(archive.binary_policy, BinaryPolicy::RequireExactlyOne);
        assert!(config.targets[1].archive.is_none());
    }

    #[test]
    fn minimal_config() {
        let config = PlatforgeConfig::from_str("[project]\nname = \"x\"\n").unwrap();
        assert_eq!(config.project.home, PathBuf::from("."));
        assert!(config.targets.is_empty());
        assert!(config.dist.is_none());
    }

    #[test]
    fn unknown_binary_policy_is_rejected() {
        let text = format!(
            "{SAMPLE}\n[[target]]\nname = \"bad\"\nmanifest = \"m\"\nbackend = \"gcc\"\n\
             staging = \"s\"\noutput = \"o\"\narchive = {{ binary_policy = \"sometimes\" }}\n"
        );
        assert!(PlatforgeConfig::from_str(&text).is_err());
    }

    #[test]
    fn target_paths_resolve_against_home() {
        let project = project();
        let spec = project.target_spec(&project.config.targets[0]).unwrap();
        assert_eq!(spec.staging, PathBuf::from("/home/sedona/./temp/unix"));
        assert_eq!(spec.installed, Some(PathBuf::from("/home/sedona/./bin/svm")));
        let flags: Vec<String> = spec.definitions.flags().collect();
        assert_eq!(flags, vec!["__UNIX__=1", "SOCKET_FAMILY_INET"]);
        assert!(spec.archive.unwrap().register);
    }

    #[test]
    fn select_targets() {
        let project = project();
        assert_eq!(project.select_targets(&[]).unwrap().len(), 2);
        let picked = project.select_targets(&["win32".to_string()]).unwrap();
        assert_eq!(picked[0].backend, "msvc");
        let err = project
            .select_targets(&["qnx".to_string()])
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown target: 'qnx'"));
        assert!(err.contains("unix, win32"));
    }

    #[test]
    fn toolchain_overrides() {
        let project = project();
        let env = project
            .toolchain_env(ToolchainEnv {
                cross_prefix: "ignored-".into(),
                ldflags: vec!["-static".into()],
                ..ToolchainEnv::default()
            })
            .unwrap();
        assert_eq!(env.cross_prefix, "arm-linux-gnueabi-");
        assert_eq!(env.cflags, vec!["-Wall"]);
        assert_eq!(env.ldflags, vec!["-static"]);
        assert_eq!(env.build_version, "1.2.28");
    }

    #[test]
    fn build_version_falls_back_to_properties() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(
            dir.path().join("lib/sedona.properties"),
            "buildVersion=1.2.29\n",
        )
        .unwrap();
        let config = PlatforgeConfig::from_str("[project]\nname = \"x\"\n").unwrap();
        let project = Project::new(config, dir.path().to_path_buf());
        assert_eq!(project.build_version().unwrap(), "1.2.29");
    }

    #[test]
    fn bad_definition_is_reported() {
        let text = "[project]\nname = \"x\"\n[[target]]\nname = \"t\"\nmanifest = \"m\"\n\
                    backend = \"gcc\"\nstaging = \"s\"\noutput = \"o\"\ndefinitions = [\"A B\"]\n";
        let config = PlatforgeConfig::from_str(text).unwrap();
        let project = Project::new(config, PathBuf::from("/h"));
        let err = project.select_targets(&[]).unwrap_err();
        assert!(format!("{err:#}").contains("target 't'"));
    }

    #[test]
    fn find_and_load_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"x\"\n").unwrap();
        let nested = dir.path().join("platforms/src");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, root) = PlatforgeConfig::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(config.project.name, "x");
        assert_eq!(root, dir.path());
    }

    #[test]
    fn dist_spec_from_config() {
        let text = "[project]\nname = \"x\"\n[dist]\nname = \"mybundle\"\nmatch_mode = \"prefix\"\n\
                    [[dist.copy]]\ndir = \"lib\"\nexcludes = [\"tmp\"]\n";
        let config = PlatforgeConfig::from_str(text).unwrap();
        let project = Project::new(config, PathBuf::from("/h"));
        let spec = project.dist_spec("2.0");
        assert_eq!(spec.archive_name(), "mybundle-2.0.zip");
        assert_eq!(spec.entries.len(), 1);
        assert_eq!(spec.match_mode, MatchMode::Prefix);
        assert_eq!(project.dist_spec("2.0").entries[0].excludes, vec!["tmp"]);
    }
}
