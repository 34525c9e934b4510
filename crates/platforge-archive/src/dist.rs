//! Distribution bundles: a filtered copy of a home directory, zipped under a
//! versioned top-level folder.

use std::fs;
use std::path::{Path, PathBuf};

use platforge_core::ContentHash;
use platforge_fsync::{copy_tree, remove_tree, zip_directory, ExcludeSet, MatchMode};
use serde::Serialize;

use crate::error::{ArchiveError, Result};

/// One directory copied into the bundle, relative to the home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistEntry {
    pub dir: String,
    /// Exclusion patterns matched against bare entry names.
    pub excludes: Vec<String>,
}

impl DistEntry {
    pub fn new(dir: impl Into<String>, excludes: &[&str]) -> Self {
        Self {
            dir: dir.into(),
            excludes: excludes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// What goes into a distribution bundle.
#[derive(Debug, Clone)]
pub struct DistSpec {
    /// Bundle base name; the zip is `<name>-<version>.zip`.
    pub name: String,
    pub version: String,
    pub entries: Vec<DistEntry>,
    pub match_mode: MatchMode,
}

impl DistSpec {
    /// The standard layout of a Sedona home directory.
    pub fn standard(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            entries: vec![
                DistEntry::new("adm", &[".DS_Store", r".*\.pyc"]),
                DistEntry::new("apps", &[".DS_Store", r".*\.sab"]),
                DistEntry::new("bin", &[".DS_Store", r".*\.exe"]),
                DistEntry::new("lib", &[".DS_Store"]),
                DistEntry::new("build/doc", &[".DS_Store"]),
                DistEntry::new("build/kits", &[".DS_Store"]),
                DistEntry::new("build/manifests", &[".DS_Store"]),
                DistEntry::new("platforms", &[".DS_Store", "tridium"]),
                DistEntry::new("scode", &[".DS_Store", r".*\.scode"]),
                DistEntry::new("src", &[".DS_Store", r".*\.iml", r".*\.class"]),
            ],
            match_mode: MatchMode::FullName,
        }
    }

    /// Top-level folder inside the zip, e.g. `sedona_community-1.2.28`.
    pub fn prefix(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.prefix())
    }
}

/// Result of a [`dist`] run.
#[derive(Debug, Clone, Serialize)]
pub struct DistReport {
    pub archive: PathBuf,
    /// Directories copied; entries whose source is missing are skipped.
    pub copied_dirs: Vec<String>,
    pub files: usize,
    pub sha256: ContentHash,
}

/// Stage `spec`'s directories from `home` into a freshly wiped `stage`, then
/// zip `stage` into `<out_dir>/<name>-<version>.zip`.
pub fn dist(home: &Path, stage: &Path, out_dir: &Path, spec: &DistSpec) -> Result<DistReport> {
    remove_tree(stage, &ExcludeSet::empty())?;
    fs::create_dir_all(stage).map_err(|e| ArchiveError::io(stage, e))?;

    let mut copied_dirs = Vec::new();
    for entry in &spec.entries {
        let src = home.join(&entry.dir);
        if !src.exists() {
            log::debug!("skip missing {}", src.display());
            continue;
        }
        let excludes = ExcludeSet::with_mode(&entry.excludes, spec.match_mode)?;
        copy_tree(&src, &stage.join(&entry.dir), &excludes, true, false)?;
        copied_dirs.push(entry.dir.clone());
    }

    let archive = out_dir.join(spec.archive_name());
    let files = zip_directory(&archive, stage, &format!("{}/", spec.prefix()))?;
    let sha256 = ContentHash::of_file(&archive).map_err(|e| ArchiveError::io(&archive, e))?;
    log::info!("Dist [{}] {files} files", archive.display());

    Ok(DistReport {
        archive,
        copied_dirs,
        files,
        sha256,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use zip::ZipArchive;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn standard_names() {
        let spec = DistSpec::standard("sedona_community", "1.2.28");
        assert_eq!(spec.prefix(), "sedona_community-1.2.28");
        assert_eq!(spec.archive_name(), "sedona_community-1.2.28.zip");
        assert_eq!(spec.entries.len(), 10);
    }

    #[test]
    fn bundle_filters_and_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        touch(&home.join("adm/env.py"));
        touch(&home.join("adm/env.pyc"));
        touch(&home.join("lib/sedona.properties"));
        touch(&home.join("platforms/tridium/secret.xml"));
        touch(&home.join("platforms/src/generic/unix/generic-unix.xml"));
        touch(&home.join("notlisted/file.txt"));

        let stage = dir.path().join("stage");
        touch(&stage.join("leftover.txt"));

        let spec = DistSpec::standard("sedona_community", "1.0");
        let report = dist(&home, &stage, dir.path(), &spec).unwrap();

        assert_eq!(report.copied_dirs, vec!["adm", "lib", "platforms"]);
        assert_eq!(report.files, 3);
        assert!(!stage.join("leftover.txt").exists());

        let zip = ZipArchive::new(File::open(&report.archive).unwrap()).unwrap();
        let mut names: Vec<&str> = zip.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "sedona_community-1.0/adm/env.py",
                "sedona_community-1.0/lib/sedona.properties",
                "sedona_community-1.0/platforms/src/generic/unix/generic-unix.xml",
            ]
        );
    }

    #[test]
    fn bad_pattern_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("home/adm/x"));
        let spec = DistSpec {
            name: "n".into(),
            version: "1".into(),
            entries: vec![DistEntry::new("adm", &["("])],
            match_mode: MatchMode::FullName,
        };
        let err = dist(
            &dir.path().join("home"),
            &dir.path().join("stage"),
            dir.path(),
            &spec,
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::Fsync(_)));
    }
}
