//! `platforge inspect`: show what a `.par` archive contains.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use platforge_archive::ParArchive;
use platforge_core::ContentHash;

pub fn run(file: &Path) -> Result<()> {
    print!("{}", describe(file)?);
    Ok(())
}

/// Human-readable summary of an archive.
pub fn describe(file: &Path) -> Result<String> {
    let mut archive = ParArchive::open(file)?;
    let sha256 =
        ContentHash::of_file(file).with_context(|| format!("hashing {}", file.display()))?;

    let mut out = String::new();
    writeln!(out, "=== Archive: {} ===", file.display())?;
    writeln!(out, "SHA-256: {sha256}")?;

    writeln!(out)?;
    writeln!(out, "--- Manifest ---")?;
    match archive.manifest()? {
        Some(manifest) => {
            writeln!(out, "  Platform: {}", manifest.platform_id)?;
            if let Some(vendor) = &manifest.vendor {
                writeln!(out, "  Vendor:   {vendor}")?;
            }
            if let Some(endian) = manifest.endian {
                writeln!(out, "  Endian:   {endian}")?;
            }
            if let Some(block_size) = manifest.block_size {
                writeln!(out, "  Block:    {block_size}")?;
            }
            if let Some(ref_size) = manifest.ref_size {
                writeln!(out, "  Ref:      {ref_size}")?;
            }
            if !manifest.native_kits.is_empty() {
                writeln!(out, "  Natives:  {}", manifest.native_kits.join(", "))?;
            }
        }
        None => writeln!(out, "  (none)")?,
    }

    writeln!(out)?;
    writeln!(out, "--- Entries ---")?;
    for name in archive.entries() {
        writeln!(out, "  {name}")?;
    }
    match archive.binary_entry() {
        Some(binary) => writeln!(out, "Binary: {binary}")?,
        None => writeln!(out, "Binary: (none)")?,
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platforge_archive::{package, PackageOptions};
    use std::fs;

    #[test]
    fn describe_packaged_archive() {
        let dir = tempfile::tempdir().unwrap();
        let stage = dir.path().join(".par");
        fs::create_dir_all(stage.join("svm")).unwrap();
        fs::write(
            stage.join("platformManifest.xml"),
            r#"<platformManifest platformId="linux-x86-generic" vendor="Sedona" endian="little">
  <natives><nativeKit depend="sys 1.2"/></natives>
</platformManifest>"#,
        )
        .unwrap();
        fs::write(stage.join("svm/svm"), b"\x7fELF").unwrap();
        let report = package(
            &stage,
            &PackageOptions {
                include_binary: true,
                ..PackageOptions::default()
            },
        )
        .unwrap();

        let text = describe(&report.archive).unwrap();
        assert!(text.contains("Platform: linux-x86-generic"));
        assert!(text.contains("Vendor:   Sedona"));
        assert!(text.contains("  platformManifest.xml"));
        assert!(text.contains("Binary: svm/svm"));
        assert!(text.contains(report.sha256.as_str()));
    }

    #[test]
    fn describe_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(describe(&dir.path().join("none.par")).is_err());
    }
}
