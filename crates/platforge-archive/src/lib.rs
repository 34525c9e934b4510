//! Platform archives.
//!
//! A platform archive (`.par`) is a deflate zip holding `platformManifest.xml`
//! at its root and, optionally, the platform's VM binary under `svm/`. This
//! crate builds archives from a staging directory, reads them back, and
//! registers them with a platform database.

pub mod dist;
pub mod error;
pub mod packager;
pub mod par;
pub mod registrar;

pub use dist::{dist, DistEntry, DistReport, DistSpec};
pub use error::{ArchiveError, Result};
pub use packager::{package, BinaryPolicy, PackageOptions, PackageReport, SVM_DIR};
pub use par::ParArchive;
pub use registrar::{CommandRegistrar, LocalPlatformDb, Registrar};
