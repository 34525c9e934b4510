//! Staleness checks and incremental copying.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::{FsyncError, Result};
use crate::exclude::ExcludeSet;

/// Counters from a [`copy_tree`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files whose bytes were written.
    pub files_copied: usize,
    /// Files left alone because the destination was up to date.
    pub files_skipped: usize,
    /// Directories visited (the root included).
    pub dirs_visited: usize,
}

/// Return the extension of `path`'s file name, or an empty string.
pub fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| FsyncError::io(path, e))
}

/// Whether `dest` must be refreshed from `src`.
///
/// True when `dest` does not exist, or when `src` was modified strictly
/// later than `dest`. Equal timestamps are up to date.
pub fn is_stale(src: &Path, dest: &Path) -> Result<bool> {
    if !dest.exists() {
        return Ok(true);
    }
    Ok(modified(src)? > modified(dest)?)
}

/// Copy `src` to `dest` byte for byte.
///
/// Unless `force` is set, the copy is skipped when `dest` is not stale.
/// Parent directories of `dest` are not created. Returns whether any bytes
/// were written.
pub fn copy_file(src: &Path, dest: &Path, force: bool) -> Result<bool> {
    if !force && !is_stale(src, dest)? {
        return Ok(false);
    }
    log::info!("    Copy \"{}\"", dest.display());
    fs::copy(src, dest).map_err(|e| FsyncError::io(dest, e))?;
    Ok(true)
}

/// Mirror `src_dir` into `dest_dir`.
///
/// Entries whose bare name matches `excludes` are skipped; an excluded
/// directory is never walked. Subdirectories are only visited when `recurse`
/// is set. Files go through [`copy_file`], so re-running over unchanged
/// inputs writes nothing.
pub fn copy_tree(
    src_dir: &Path,
    dest_dir: &Path,
    excludes: &ExcludeSet,
    recurse: bool,
    force: bool,
) -> Result<SyncStats> {
    log::info!("  Directory \"{}\"", dest_dir.display());
    fs::create_dir_all(dest_dir).map_err(|e| FsyncError::io(dest_dir, e))?;

    let mut stats = SyncStats {
        dirs_visited: 1,
        ..SyncStats::default()
    };
    let max_depth = if recurse { usize::MAX } else { 1 };
    let walker = WalkDir::new(src_dir)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !excludes.matches_os(e.file_name()));

    for entry in walker {
        let entry = entry?;
        if entry.depth() == 0 {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(src_dir) else {
            continue;
        };
        let target = dest_dir.join(rel);

        if entry.file_type().is_dir() {
            if recurse {
                log::debug!("  Directory \"{}\"", target.display());
                fs::create_dir_all(&target).map_err(|e| FsyncError::io(&target, e))?;
                stats.dirs_visited += 1;
            }
        } else if copy_file(entry.path(), &target, force)? {
            stats.files_copied += 1;
        } else {
            stats.files_skipped += 1;
        }
    }

    Ok(stats)
}
