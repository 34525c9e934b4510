//! Exclusion-aware recursive removal.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{FsyncError, Result};
use crate::exclude::ExcludeSet;

/// Treat a vanished entry as already removed.
fn tolerate_missing(path: &Path, result: std::io::Result<()>) -> Result<()> {
    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("already gone: {}", path.display());
            Ok(())
        }
        other => other.map_err(|e| FsyncError::io(path, e)),
    }
}

fn remove_entry(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FsyncError::io(path, e)),
    };
    if meta.is_dir() {
        tolerate_missing(path, fs::remove_dir_all(path))
    } else {
        tolerate_missing(path, fs::remove_file(path))
    }
}

/// Recursively remove `path`.
///
/// A missing `path` is a silent success. With an empty `excludes` the whole
/// tree goes in one bulk removal. Otherwise the entries directly under `path`
/// whose names match are kept (and not descended into), everything else is
/// removed entry by entry, and `path` itself stays. Entries that disappear
/// mid-walk are ignored; any other I/O error aborts.
pub fn remove_tree(path: &Path, excludes: &ExcludeSet) -> Result<()> {
    if fs::symlink_metadata(path).is_err() {
        return Ok(());
    }
    log::info!("  Removing \"{}\"", path.display());

    if excludes.is_empty() || !path.is_dir() {
        return remove_entry(path);
    }

    let entries = fs::read_dir(path).map_err(|e| FsyncError::io(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FsyncError::io(path, e))?;
        if excludes.matches_os(&entry.file_name()) {
            log::debug!("  Keeping \"{}\"", entry.path().display());
            continue;
        }
        remove_entry(&entry.path())?;
    }
    Ok(())
}

/// Remove the subdirectories of `path` whose names are not excluded,
/// leaving the files directly inside `path` in place.
pub fn remove_subdirs(path: &Path, excludes: &ExcludeSet) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let entries = fs::read_dir(path).map_err(|e| FsyncError::io(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FsyncError::io(path, e))?;
        if excludes.matches_os(&entry.file_name()) {
            continue;
        }
        let child = entry.path();
        if child.is_dir() {
            remove_tree(&child, &ExcludeSet::empty())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("keep/inner")).unwrap();
        fs::create_dir_all(root.join("gen/deep")).unwrap();
        fs::write(root.join("keep/inner/k.txt"), "k").unwrap();
        fs::write(root.join("gen/deep/g.c"), "g").unwrap();
        fs::write(root.join("top.c"), "t").unwrap();
    }

    #[test]
    fn removes_whole_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("stage");
        populate(&root);

        remove_tree(&root, &ExcludeSet::empty()).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn missing_path_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        remove_tree(&missing, &ExcludeSet::empty()).unwrap();
        remove_tree(&missing, &ExcludeSet::new(["x"]).unwrap()).unwrap();
        remove_subdirs(&missing, &ExcludeSet::new(["x"]).unwrap()).unwrap();
        assert!(!missing.exists());
    }

    #[test]
    fn entry_vanishing_after_listing_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("stage");
        populate(&root);
        let listed: Vec<_> = fs::read_dir(&root)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();

        // another process removes everything between listing and removal
        fs::remove_dir_all(&root).unwrap();
        for path in &listed {
            remove_entry(path).unwrap();
            tolerate_missing(path, fs::remove_file(path)).unwrap();
            tolerate_missing(path, fs::remove_dir_all(path)).unwrap();
        }
    }

    #[test]
    fn other_io_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        let err = tolerate_missing(&sub, fs::remove_file(&sub)).unwrap_err();
        assert!(matches!(err, FsyncError::Io { .. }));
    }

    #[test]
    fn second_removal_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("stage");
        populate(&root);
        remove_tree(&root, &ExcludeSet::empty()).unwrap();
        remove_tree(&root, &ExcludeSet::empty()).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn exclusions_keep_matching_entries_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("stage");
        populate(&root);

        remove_tree(&root, &ExcludeSet::new(["keep"]).unwrap()).unwrap();
        assert!(root.exists());
        assert!(root.join("keep/inner/k.txt").exists());
        assert!(!root.join("gen").exists());
        assert!(!root.join("top.c").exists());
    }

    #[test]
    fn removes_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("svm.exe");
        fs::write(&file, "bin").unwrap();
        remove_tree(&file, &ExcludeSet::empty()).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn remove_subdirs_keeps_files_and_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("stage");
        populate(&root);

        remove_subdirs(&root, &ExcludeSet::new(["keep"]).unwrap()).unwrap();
        assert!(root.join("top.c").exists());
        assert!(root.join("keep").exists());
        assert!(!root.join("gen").exists());
    }
}
