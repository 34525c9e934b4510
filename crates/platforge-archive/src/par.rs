//! Reading platform archives.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use platforge_platform::{PlatformManifest, MANIFEST_FILE_NAME};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{ArchiveError, Result};
use crate::packager::SVM_DIR;

/// An opened `.par` file.
pub struct ParArchive {
    path: PathBuf,
    names: Vec<String>,
    zip: ZipArchive<File>,
}

impl fmt::Debug for ParArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParArchive")
            .field("path", &self.path)
            .field("entries", &self.names)
            .finish()
    }
}

impl ParArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| ArchiveError::zip(path, e))?;
        let mut names = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let entry = zip
                .by_index(index)
                .map_err(|e| ArchiveError::zip(path, e))?;
            names.push(entry.name().to_string());
        }
        Ok(Self {
            path: path.to_path_buf(),
            names,
            zip,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in archive order.
    pub fn entries(&self) -> &[String] {
        &self.names
    }

    /// Name of the VM binary entry, if the archive carries one.
    pub fn binary_entry(&self) -> Option<String> {
        let prefix = format!("{SVM_DIR}/");
        self.names
            .iter()
            .find(|name| name.starts_with(&prefix) && name.len() > prefix.len())
            .cloned()
    }

    /// Read one entry fully.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self
            .zip
            .by_name(name)
            .map_err(|e| ArchiveError::zip(&self.path, e))?;
        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| ArchiveError::io(&self.path, e))?;
        Ok(data)
    }

    /// Parse the archive's platform manifest. `None` if the archive has none.
    pub fn manifest(&mut self) -> Result<Option<PlatformManifest>> {
        let data = match self.read_entry(MANIFEST_FILE_NAME) {
            Ok(data) => data,
            Err(ArchiveError::Zip {
                source: ZipError::FileNotFound,
                ..
            }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let text = String::from_utf8_lossy(&data);
        let origin = self.path.join(MANIFEST_FILE_NAME);
        Ok(Some(PlatformManifest::parse(&text, &origin)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn archive_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.par");
        write_zip(&path, &[("svm/svm", b"bin")]);

        let mut par = ParArchive::open(&path).unwrap();
        assert!(par.manifest().unwrap().is_none());
        assert_eq!(par.binary_entry().as_deref(), Some("svm/svm"));
    }

    #[test]
    fn manifest_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.par");
        write_zip(
            &path,
            &[(
                MANIFEST_FILE_NAME,
                br#"<platformManifest platformId="qnx-ppc-generic" endian="big"/>"#,
            )],
        );
        let mut par = ParArchive::open(&path).unwrap();
        let m = par.manifest().unwrap().unwrap();
        assert_eq!(m.platform_id.as_str(), "qnx-ppc-generic");
        assert_eq!(par.binary_entry(), None);
        assert_eq!(par.entries(), vec![MANIFEST_FILE_NAME]);
    }

    #[test]
    fn not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.par");
        std::fs::write(&path, "definitely not a zip").unwrap();
        assert!(matches!(
            ParArchive::open(&path),
            Err(ArchiveError::Zip { .. })
        ));
    }

    #[test]
    fn read_entry_returns_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.par");
        let binary: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
        write_zip(&path, &[("svm/svm", &binary), ("empty", b"")]);

        let mut par = ParArchive::open(&path).unwrap();
        assert_eq!(par.read_entry("svm/svm").unwrap(), binary);
        assert!(par.read_entry("empty").unwrap().is_empty());
    }

    #[test]
    fn missing_entry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.par");
        write_zip(&path, &[("a", b"1")]);
        let mut par = ParArchive::open(&path).unwrap();
        assert!(par.read_entry("b").is_err());
    }
}
