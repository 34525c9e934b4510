//! Deflate zip construction from a directory tree.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{FsyncError, Result};

/// Archive entry name for a path relative to the zipped root, using `/`
/// separators regardless of host platform.
pub fn entry_name(prefix: &str, rel: &Path) -> String {
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{prefix}{rel}")
}

/// Zip every regular file under `src_dir` into `zip_path`.
///
/// Each entry is named `entry_prefix + relative/path`. Directories get no
/// entries of their own. Files are added in sorted path order so the same
/// tree always yields the same entry sequence. The parent of `zip_path` is
/// created if needed and an existing archive is overwritten.
///
/// Returns the number of entries written.
pub fn zip_directory(zip_path: &Path, src_dir: &Path, entry_prefix: &str) -> Result<usize> {
    if let Some(parent) = zip_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| FsyncError::io(parent, e))?;
        }
    }

    let file = File::create(zip_path).map_err(|e| FsyncError::io(zip_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let zip_err = |source| FsyncError::Zip {
        path: zip_path.to_path_buf(),
        source,
    };

    let mut count = 0;
    for entry in WalkDir::new(src_dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(src_dir) else {
            continue;
        };
        let name = entry_name(entry_prefix, rel);
        log::info!("  Zip {name}");

        zip.start_file(name.as_str(), options).map_err(zip_err)?;
        let mut input = File::open(entry.path()).map_err(|e| FsyncError::io(entry.path(), e))?;
        io::copy(&mut input, &mut zip).map_err(|e| FsyncError::io(entry.path(), e))?;
        count += 1;
    }

    zip.finish().map_err(zip_err)?;
    Ok(count)
}
