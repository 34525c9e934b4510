//! Platform descriptors: the `<sedonaPlatform>` build input for a target.

use std::path::{Path, PathBuf};

use platforge_core::PlatformId;
use serde::Serialize;

use crate::error::Result;
use crate::xml::{self, PLATFORM_ROOT};

/// A validation issue found in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// The `<compile>` section of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileSection {
    pub endian: Option<String>,
    pub block_size: Option<u32>,
    pub ref_size: Option<u32>,
    pub debug: bool,
    pub test: bool,
    pub native_kits: Vec<String>,
    pub native_sources: Vec<String>,
}

/// A validated platform descriptor together with the staging directory it
/// will be generated into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformDescriptor {
    pub manifest: PathBuf,
    pub staging_dir: PathBuf,
    /// The raw `id` attribute. May contain `${...}` placeholders that the kit
    /// generator expands.
    pub id: Option<String>,
    pub vendor: Option<String>,
    pub compile: Option<CompileSection>,
}

impl PlatformDescriptor {
    /// Read `manifest` and verify that it is a platform descriptor.
    ///
    /// Fails when the file is missing, is not XML, has a root other than
    /// `<sedonaPlatform>`, or carries a literal `id` that is not a valid
    /// platform identifier.
    pub fn load(manifest: &Path, staging_dir: &Path) -> Result<Self> {
        let text = xml::read_text(manifest)?;
        let doc = xml::parse(&text, manifest)?;
        let root = xml::expect_root(&doc, PLATFORM_ROOT, manifest)?;

        let id = root.attribute("id").map(str::to_string);
        if let Some(raw) = id.as_deref() {
            if !raw.contains("${") {
                PlatformId::parse(raw)?;
            }
        }

        let compile = match xml::children(root, "compile").next() {
            None => None,
            Some(node) => Some(CompileSection {
                endian: node.attribute("endian").map(str::to_string),
                block_size: xml::attr_u32(node, "blockSize", manifest)?,
                ref_size: xml::attr_u32(node, "refSize", manifest)?,
                debug: xml::attr_bool(node, "debug", manifest)?,
                test: xml::attr_bool(node, "test", manifest)?,
                native_kits: xml::children(node, "nativeKit")
                    .filter_map(|n| n.attribute("depend"))
                    .map(str::to_string)
                    .collect(),
                native_sources: xml::children(node, "nativeSource")
                    .filter_map(|n| n.attribute("path"))
                    .map(str::to_string)
                    .collect(),
            }),
        };

        Ok(Self {
            manifest: manifest.to_path_buf(),
            staging_dir: staging_dir.to_path_buf(),
            id,
            vendor: root.attribute("vendor").map(str::to_string),
            compile,
        })
    }

    /// The platform identifier, when the descriptor spells it out literally.
    pub fn platform_id(&self) -> Option<PlatformId> {
        self.id
            .as_deref()
            .filter(|raw| !raw.contains("${"))
            .and_then(|raw| PlatformId::parse(raw).ok())
    }

    /// Check the descriptor for problems the kit generator would reject.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.id.is_none() {
            issues.push(ValidationIssue {
                severity: "warning",
                message: "descriptor has no 'id' attribute".into(),
            });
        }
        if self.vendor.is_none() {
            issues.push(ValidationIssue {
                severity: "error",
                message: "descriptor has no 'vendor' attribute".into(),
            });
        }

        let Some(compile) = &self.compile else {
            issues.push(ValidationIssue {
                severity: "error",
                message: "descriptor has no <compile> section".into(),
            });
            return issues;
        };

        match compile.endian.as_deref() {
            Some("big") | Some("little") => {}
            Some(other) => issues.push(ValidationIssue {
                severity: "error",
                message: format!("endian must be 'big' or 'little', got '{other}'"),
            }),
            None => issues.push(ValidationIssue {
                severity: "error",
                message: "<compile> is missing 'endian'".into(),
            }),
        }
        if compile.block_size.is_none() {
            issues.push(ValidationIssue {
                severity: "error",
                message: "<compile> is missing 'blockSize'".into(),
            });
        }
        match compile.ref_size {
            Some(4) | Some(8) => {}
            Some(other) => issues.push(ValidationIssue {
                severity: "error",
                message: format!("refSize must be 4 or 8, got {other}"),
            }),
            None => issues.push(ValidationIssue {
                severity: "error",
                message: "<compile> is missing 'refSize'".into(),
            }),
        }
        if compile.native_kits.is_empty() {
            issues.push(ValidationIssue {
                severity: "warning",
                message: "no native kits declared".into(),
            });
        }

        issues
    }
}
