//! `platforge clean`: remove staging directories.

use anyhow::Result;
use platforge_build::clean_target;

use crate::config::Project;

/// Remove the staging directory of each named target (all when empty).
pub fn run(project: &Project, targets: &[String]) -> Result<()> {
    for spec in project.select_targets(targets)? {
        if spec.staging.exists() {
            clean_target(&spec)?;
            println!("Removed {}", spec.staging.display());
        } else {
            println!("Already clean: {}", spec.staging.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatforgeConfig;
    use std::fs;

    const CONFIG: &str = r#"
[project]
name = "sedona"

[[target]]
name = "unix"
manifest = "m.xml"
backend = "gcc"
staging = "temp/unix"
output = "svm"

[[target]]
name = "win32"
manifest = "m.xml"
backend = "msvc"
staging = "temp/win32"
output = "svm.exe"
"#;

    #[test]
    fn clean_removes_only_selected_staging() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(
            PlatforgeConfig::from_str(CONFIG).unwrap(),
            dir.path().to_path_buf(),
        );
        fs::create_dir_all(dir.path().join("temp/unix/.par")).unwrap();
        fs::write(dir.path().join("temp/unix/vm.c"), "x").unwrap();
        fs::create_dir_all(dir.path().join("temp/win32")).unwrap();

        run(&project, &["unix".to_string()]).unwrap();
        assert!(!dir.path().join("temp/unix").exists());
        assert!(dir.path().join("temp/win32").exists());

        // idempotent
        run(&project, &[]).unwrap();
        assert!(!dir.path().join("temp/win32").exists());
    }
}
