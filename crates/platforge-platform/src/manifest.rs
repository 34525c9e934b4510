//! The `platformManifest.xml` document produced by the kit generator.

use std::fmt;
use std::path::Path;

use platforge_core::PlatformId;
use serde::Serialize;

use crate::error::{PlatformError, Result};
use crate::xml::{self, MANIFEST_ROOT};

/// File name of the manifest inside a staging directory and inside an archive.
pub const MANIFEST_FILE_NAME: &str = "platformManifest.xml";

/// Byte order declared by a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Big,
    Little,
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Big => write!(f, "big"),
            Endian::Little => write!(f, "little"),
        }
    }
}

/// Typed view of a `<platformManifest>` root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformManifest {
    pub platform_id: PlatformId,
    pub vendor: Option<String>,
    pub endian: Option<Endian>,
    pub block_size: Option<u32>,
    pub ref_size: Option<u32>,
    pub arm_double: bool,
    pub debug: bool,
    pub test: bool,
    /// Kits named by `<natives><nativeKit depend="..."/></natives>`.
    pub native_kits: Vec<String>,
}

impl PlatformManifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = xml::read_text(path)?;
        Self::parse(&text, path)
    }

    /// Parse manifest text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let doc = xml::parse(text, origin)?;
        let root = xml::expect_root(&doc, MANIFEST_ROOT, origin)?;

        let raw_id = root
            .attribute("platformId")
            .ok_or_else(|| PlatformError::MissingAttribute {
                path: origin.to_path_buf(),
                element: MANIFEST_ROOT.to_string(),
                attribute: "platformId",
            })?;
        let platform_id = PlatformId::parse(raw_id)?;

        let endian = match root.attribute("endian") {
            None => None,
            Some("big") => Some(Endian::Big),
            Some("little") => Some(Endian::Little),
            Some(other) => {
                return Err(PlatformError::InvalidAttribute {
                    path: origin.to_path_buf(),
                    attribute: "endian",
                    value: other.to_string(),
                })
            }
        };

        let native_kits = xml::children(root, "natives")
            .flat_map(|natives| xml::children(natives, "nativeKit"))
            .filter_map(|kit| kit.attribute("depend"))
            .map(str::to_string)
            .collect();

        Ok(Self {
            platform_id,
            vendor: root.attribute("vendor").map(str::to_string),
            endian,
            block_size: xml::attr_u32(root, "blockSize", origin)?,
            ref_size: xml::attr_u32(root, "refSize", origin)?,
            arm_double: xml::attr_bool(root, "armDouble", origin)?,
            debug: xml::attr_bool(root, "debug", origin)?,
            test: xml::attr_bool(root, "test", origin)?,
            native_kits,
        })
    }
}
