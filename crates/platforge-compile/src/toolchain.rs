//! Toolchain settings shared by every backend.

use std::path::PathBuf;

/// Toolchain settings, read once at startup and passed to backends.
///
/// Backends never consult the process environment themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    /// Vendor toolchain install root (`VCINSTALLDIR` for msvc).
    pub vendor_root: Option<PathBuf>,
    /// Platform SDK root; derived from `vendor_root` when unset.
    pub sdk_root: Option<PathBuf>,
    /// Prefix prepended to compiler names, e.g. `arm-linux-gnueabi-`.
    pub cross_prefix: String,
    pub sysroot: Option<PathBuf>,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
    /// Architecture of the build host, as in `std::env::consts::ARCH`.
    pub host_arch: String,
    /// Value baked into `PLAT_BUILD_VERSION`.
    pub build_version: String,
}

impl ToolchainEnv {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let split = |key: &str| {
            get(key)
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };
        Self {
            vendor_root: get("VCINSTALLDIR").map(PathBuf::from),
            sdk_root: get("WIN_SDK").or_else(|| get("win_sdk")).map(PathBuf::from),
            cross_prefix: get("CROSS_COMPILE").unwrap_or_default(),
            sysroot: get("SYSROOT").map(PathBuf::from),
            cflags: split("CFLAGS"),
            ldflags: split("LDFLAGS"),
            host_arch: std::env::consts::ARCH.to_string(),
            build_version: String::new(),
        }
    }

    /// A copy with a different build version.
    pub fn with_build_version(&self, version: impl Into<String>) -> Self {
        Self {
            build_version: version.into(),
            ..self.clone()
        }
    }

    /// Compiler program name with the cross prefix applied.
    pub fn tool(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{name}", self.cross_prefix))
    }

    /// Whether this is a cross build.
    pub fn is_cross(&self) -> bool {
        !self.cross_prefix.is_empty()
    }
}
