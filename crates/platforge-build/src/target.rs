//! Target specifications and per-run build options.

use std::fmt;
use std::path::{Path, PathBuf};

use platforge_archive::BinaryPolicy;
use platforge_compile::{BuildRequest, Definitions};
use platforge_core::platform_id::PAR_DIR;
use serde::Serialize;

/// Socket API the VM is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketFamily {
    Inet,
    Inet6,
}

impl SocketFamily {
    const ALL: [SocketFamily; 2] = [SocketFamily::Inet, SocketFamily::Inet6];

    /// Preprocessor symbol selecting this family.
    pub fn definition(self) -> &'static str {
        match self {
            SocketFamily::Inet => "SOCKET_FAMILY_INET",
            SocketFamily::Inet6 => "SOCKET_FAMILY_INET6",
        }
    }
}

impl fmt::Display for SocketFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketFamily::Inet => write!(f, "inet"),
            SocketFamily::Inet6 => write!(f, "inet6"),
        }
    }
}

/// Options that apply to every target in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Overrides the toolchain's build version.
    pub version: Option<String>,
    /// Replaces whichever socket family the target defines.
    pub socket_family: Option<SocketFamily>,
}

/// Packaging settings for a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveOptions {
    pub include_binary: bool,
    pub register: bool,
    pub binary_policy: BinaryPolicy,
}

/// Everything needed to build one platform's VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub name: String,
    /// The platform descriptor (`<sedonaPlatform>`).
    pub manifest: PathBuf,
    /// Wiped and regenerated on every build.
    pub staging: PathBuf,
    pub backend: String,
    /// Where the compiler writes the executable.
    pub output: PathBuf,
    /// Source entries relative to the staging directory.
    pub sources: Vec<String>,
    pub includes: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub definitions: Definitions,
    /// Well-known location the executable is published to.
    pub installed: Option<PathBuf>,
    /// Package `<staging>/.par` after publishing.
    pub archive: Option<ArchiveOptions>,
}

impl TargetSpec {
    /// Start a spec with no sources, includes, libraries or definitions.
    pub fn new(
        name: impl Into<String>,
        manifest: &Path,
        staging: &Path,
        backend: impl Into<String>,
        output: &Path,
    ) -> Self {
        Self {
            name: name.into(),
            manifest: manifest.to_path_buf(),
            staging: staging.to_path_buf(),
            backend: backend.into(),
            output: output.to_path_buf(),
            sources: Vec::new(),
            includes: Vec::new(),
            libraries: Vec::new(),
            definitions: Definitions::new(),
            installed: None,
            archive: None,
        }
    }

    /// The generator's archive staging directory, `<staging>/.par`.
    pub fn par_dir(&self) -> PathBuf {
        self.staging.join(PAR_DIR)
    }

    /// File name of the output executable.
    pub fn output_name(&self) -> String {
        self.output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// The compile request for this target under `options`.
    pub fn request(&self, options: &BuildOptions) -> BuildRequest {
        let mut definitions = self.definitions.clone();
        if let Some(family) = options.socket_family {
            for other in SocketFamily::ALL {
                definitions.remove(other.definition());
            }
            definitions.insert(family.definition(), None);
        }
        BuildRequest {
            backend: self.backend.clone(),
            artifact: self.output.clone(),
            sources: self.sources.clone(),
            includes: self.includes.clone(),
            libraries: self.libraries.clone(),
            definitions,
            work_dir: self.staging.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix_target() -> TargetSpec {
        let mut target = TargetSpec::new(
            "unix",
            Path::new("/h/platforms/src/generic/unix/generic-unix.xml"),
            Path::new("/h/temp/unix"),
            "gcc",
            Path::new("/h/platforms/src/generic/unix/svm"),
        );
        target.sources.push("*.c".into());
        target.definitions.insert("__UNIX__", Some("1".into()));
        target.definitions.insert("SOCKET_FAMILY_INET", None);
        target
    }

    #[test]
    fn request_mirrors_target() {
        let target = unix_target();
        let req = target.request(&BuildOptions::default());
        assert_eq!(req.backend, "gcc");
        assert_eq!(req.work_dir, PathBuf::from("/h/temp/unix"));
        assert_eq!(req.sources, vec!["*.c"]);
        assert_eq!(req.definitions, target.definitions);
    }

    #[test]
    fn socket_family_is_exclusive() {
        let target = unix_target();
        let options = BuildOptions {
            socket_family: Some(SocketFamily::Inet6),
            ..BuildOptions::default()
        };
        let req = target.request(&options);
        let flags: Vec<String> = req.definitions.flags().collect();
        assert_eq!(flags, vec!["__UNIX__=1", "SOCKET_FAMILY_INET6"]);
    }

    #[test]
    fn par_dir_and_output_name() {
        let target = unix_target();
        assert_eq!(target.par_dir(), PathBuf::from("/h/temp/unix/.par"));
        assert_eq!(target.output_name(), "svm");
    }
}
