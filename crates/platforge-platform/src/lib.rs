//! Platform descriptors and platform manifests.
//!
//! Two XML documents identify a target platform:
//! - **Descriptor** (`<sedonaPlatform>`): the build input consumed by the kit
//!   generator. Validated before any toolchain runs.
//! - **Manifest** (`<platformManifest>`): the generator's output, carried in
//!   every platform archive and keyed by its `platformId` attribute.

pub mod descriptor;
pub mod error;
pub mod manifest;
mod xml;

pub use descriptor::{CompileSection, PlatformDescriptor, ValidationIssue};
pub use error::{PlatformError, Result};
pub use manifest::{Endian, PlatformManifest, MANIFEST_FILE_NAME};
pub use xml::{MANIFEST_ROOT, PLATFORM_ROOT};
