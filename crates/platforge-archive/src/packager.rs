//! Packaging a staging directory into a platform archive.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use platforge_core::{ContentHash, PlatformId};
use platforge_fsync::{remove_tree, ExcludeSet};
use platforge_platform::{PlatformManifest, MANIFEST_FILE_NAME};
use serde::{Deserialize, Serialize};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ArchiveError, Result};

/// Directory holding the VM binary, in the staging dir and in the archive.
pub const SVM_DIR: &str = "svm";

/// What to do when the binary directory does not hold exactly one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryPolicy {
    /// Zero or several files in an existing `svm/` is an error; nothing is
    /// written.
    #[default]
    RequireExactlyOne,
    /// Zero or several candidates leaves the binary out of the archive.
    OmitIfAmbiguous,
}

/// Options for [`package`].
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Archive path. Defaults to `<staging>/out/<platformId>.par`.
    pub output: Option<PathBuf>,
    /// Add the binary from `<staging>/svm/` under `svm/`.
    pub include_binary: bool,
    pub binary_policy: BinaryPolicy,
}

/// Result of a successful [`package`] call.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub archive: PathBuf,
    pub platform_id: PlatformId,
    /// Entry names in archive order.
    pub entries: Vec<String>,
    pub sha256: ContentHash,
}

/// Regular files directly under `dir`, sorted. `None` if `dir` is missing.
fn binary_candidates(dir: &Path) -> Result<Option<Vec<PathBuf>>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ArchiveError::io(dir, e))? {
        let path = entry.map_err(|e| ArchiveError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(Some(files))
}

/// Pick the binary to archive. A stage without `svm/` has none under any
/// policy; the policy only decides what a wrong count in `svm/` means.
fn select_binary(staging: &Path, policy: BinaryPolicy) -> Result<Option<PathBuf>> {
    let dir = staging.join(SVM_DIR);
    let Some(mut candidates) = binary_candidates(&dir)? else {
        log::debug!("no {} directory, archiving without a binary", dir.display());
        return Ok(None);
    };
    if candidates.len() == 1 {
        return Ok(candidates.pop());
    }
    match policy {
        BinaryPolicy::RequireExactlyOne => Err(ArchiveError::BinaryCount {
            dir,
            found: candidates.len(),
        }),
        BinaryPolicy::OmitIfAmbiguous => {
            log::warn!(
                "{} binaries in {}, archiving without one",
                candidates.len(),
                dir.display()
            );
            Ok(None)
        }
    }
}

/// Resolve the archive path, preparing its directory.
///
/// The default `out/` directory is wiped first so it only ever holds the
/// archive just written.
fn prepare_output(staging: &Path, id: &PlatformId, explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    log::info!("Creating folder {}", parent.display());
                    fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
                }
            }
            Ok(path.to_path_buf())
        }
        None => {
            let out_dir = staging.join("out");
            remove_tree(&out_dir, &ExcludeSet::empty())?;
            fs::create_dir_all(&out_dir).map_err(|e| ArchiveError::io(&out_dir, e))?;
            Ok(out_dir.join(id.archive_file_name()))
        }
    }
}

fn add_file(
    zip: &mut ZipWriter<File>,
    archive: &Path,
    name: &str,
    src: &Path,
    options: FileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| ArchiveError::zip(archive, e))?;
    let mut input = File::open(src).map_err(|e| ArchiveError::io(src, e))?;
    io::copy(&mut input, zip).map_err(|e| ArchiveError::io(archive, e))?;
    log::debug!("  add {name}");
    Ok(())
}

/// Package `staging` into a platform archive.
///
/// All validation (manifest present and well-formed, binary count) happens
/// before the archive file is created, so a failed call leaves no archive
/// behind.
pub fn package(staging: &Path, options: &PackageOptions) -> Result<PackageReport> {
    if !staging.is_dir() {
        return Err(ArchiveError::NotADirectory {
            path: staging.to_path_buf(),
        });
    }
    let manifest_path = staging.join(MANIFEST_FILE_NAME);
    if !manifest_path.is_file() {
        return Err(ArchiveError::MissingManifest {
            path: manifest_path,
        });
    }
    let manifest = PlatformManifest::load(&manifest_path)?;
    let platform_id = manifest.platform_id;

    let binary = if options.include_binary {
        select_binary(staging, options.binary_policy)?
    } else {
        None
    };

    let archive = prepare_output(staging, &platform_id, options.output.as_deref())?;
    log::info!("Archive [{}]", archive.display());

    let file = File::create(&archive).map_err(|e| ArchiveError::io(&archive, e))?;
    let mut zip = ZipWriter::new(file);
    let deflate = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = vec![MANIFEST_FILE_NAME.to_string()];
    add_file(&mut zip, &archive, MANIFEST_FILE_NAME, &manifest_path, deflate)?;

    if let Some(binary) = &binary {
        let file_name = binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{SVM_DIR}/{file_name}");
        add_file(
            &mut zip,
            &archive,
            &name,
            binary,
            deflate.unix_permissions(0o755),
        )?;
        entries.push(name);
    }

    let mut file = zip.finish().map_err(|e| ArchiveError::zip(&archive, e))?;
    file.flush().map_err(|e| ArchiveError::io(&archive, e))?;
    drop(file);

    let sha256 = ContentHash::of_file(&archive).map_err(|e| ArchiveError::io(&archive, e))?;
    Ok(PackageReport {
        archive,
        platform_id,
        entries,
        sha256,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::par::ParArchive;
    use platforge_core::{Classify, FailureClass};

    fn stage(dir: &Path, id: &str, binaries: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE_NAME),
            format!(r#"<platformManifest platformId="{id}" vendor="Tridium"/>"#),
        )
        .unwrap();
        if !binaries.is_empty() {
            fs::create_dir_all(dir.join(SVM_DIR)).unwrap();
        }
        for name in binaries {
            fs::write(dir.join(SVM_DIR).join(name), b"\x7fELF").unwrap();
        }
    }

    fn with_binary() -> PackageOptions {
        PackageOptions {
            include_binary: true,
            ..PackageOptions::default()
        }
    }

    #[test]
    fn manifest_and_binary() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join(".par");
        stage(&staging, "linux-x86-generic", &["svm"]);

        let report = package(&staging, &with_binary()).unwrap();
        assert_eq!(
            report.archive,
            staging.join("out").join("linux-x86-generic.par")
        );
        assert_eq!(report.entries, vec!["platformManifest.xml", "svm/svm"]);
        assert_eq!(report.sha256, ContentHash::of_file(&report.archive).unwrap());

        let mut par = ParArchive::open(&report.archive).unwrap();
        assert_eq!(par.entries().len(), 2);
        let manifest = par.manifest().unwrap().unwrap();
        assert_eq!(manifest.platform_id.as_str(), "linux-x86-generic");
        assert_eq!(par.read_entry("svm/svm").unwrap(), b"\x7fELF");
    }

    #[test]
    fn manifest_only_without_binary_flag() {
        let dir = tempfile::tempdir().unwrap();
        stage(dir.path(), "win32-x86-generic", &["svm.exe"]);
        let report = package(dir.path(), &PackageOptions::default()).unwrap();
        assert_eq!(report.entries, vec!["platformManifest.xml"]);
    }

    #[test]
    fn missing_manifest_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("x.par");
        let options = PackageOptions {
            output: Some(out.clone()),
            ..PackageOptions::default()
        };
        let err = package(dir.path(), &options).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingManifest { .. }));
        assert_eq!(err.class(), FailureClass::Validation);
        assert!(!out.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn strict_policy_rejects_zero_or_many() {
        let dir = tempfile::tempdir().unwrap();
        stage(dir.path(), "a-b", &[]);
        fs::create_dir_all(dir.path().join(SVM_DIR)).unwrap();
        let err = package(dir.path(), &with_binary()).unwrap_err();
        assert!(matches!(err, ArchiveError::BinaryCount { found: 0, .. }));

        stage(dir.path(), "a-b", &["svm", "svm.old"]);
        let err = package(dir.path(), &with_binary()).unwrap_err();
        assert!(matches!(err, ArchiveError::BinaryCount { found: 2, .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn strict_policy_without_svm_dir_omits_binary() {
        let dir = tempfile::tempdir().unwrap();
        stage(dir.path(), "a-b", &[]);
        assert!(!dir.path().join(SVM_DIR).exists());

        let report = package(dir.path(), &with_binary()).unwrap();
        assert_eq!(report.entries, vec!["platformManifest.xml"]);
        let archive = ParArchive::open(&report.archive).unwrap();
        assert_eq!(archive.binary_entry(), None);
    }

    #[test]
    fn loose_policy_omits_binary() {
        let dir = tempfile::tempdir().unwrap();
        stage(dir.path(), "a-b", &["svm", "svm.old"]);
        let options = PackageOptions {
            include_binary: true,
            binary_policy: BinaryPolicy::OmitIfAmbiguous,
            ..PackageOptions::default()
        };
        let report = package(dir.path(), &options).unwrap();
        assert_eq!(report.entries, vec!["platformManifest.xml"]);
    }

    #[test]
    fn default_out_dir_is_wiped() {
        let dir = tempfile::tempdir().unwrap();
        stage(dir.path(), "a-b", &[]);
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("out/stale.par"), "old").unwrap();

        package(dir.path(), &PackageOptions::default()).unwrap();
        assert!(!dir.path().join("out/stale.par").exists());
        assert!(dir.path().join("out/a-b.par").is_file());
    }

    #[test]
    fn explicit_output_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("stage");
        stage(&staging, "a-b", &[]);
        let out = dir.path().join("dist/nested/a-b.par");
        fs::create_dir_all(out.parent().unwrap()).unwrap();
        fs::write(&out, "garbage").unwrap();
        fs::write(out.with_file_name("keep.txt"), "x").unwrap();

        let options = PackageOptions {
            output: Some(out.clone()),
            ..PackageOptions::default()
        };
        let report = package(&staging, &options).unwrap();
        assert_eq!(report.archive, out);
        assert!(ParArchive::open(&out).is_ok());
        assert!(out.with_file_name("keep.txt").exists());
        assert!(!staging.join("out").exists());
    }

    #[test]
    fn wrong_manifest_root_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            r#"<sedonaPlatform id="a-b"/>"#,
        )
        .unwrap();
        let err = package(dir.path(), &PackageOptions::default()).unwrap_err();
        assert_eq!(err.class(), FailureClass::Validation);
    }

    #[test]
    fn missing_staging_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = package(&dir.path().join("nope"), &PackageOptions::default()).unwrap_err();
        assert!(matches!(err, ArchiveError::NotADirectory { .. }));
    }
}
