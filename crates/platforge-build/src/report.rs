//! Build report for one target.

use std::fmt;
use std::path::PathBuf;

use platforge_archive::PackageReport;
use serde::Serialize;

use crate::pipeline::Step;

/// Wall-clock time spent in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepTiming {
    pub step: Step,
    pub duration_ms: u64,
}

/// Summary of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Target name.
    pub target: String,
    /// Platform identifier, when the descriptor or archive states one.
    pub platform_id: Option<String>,
    pub backend: String,
    pub build_version: String,
    /// Number of source files compiled.
    pub sources: usize,
    /// The compiled executable.
    pub artifact: PathBuf,
    /// Where the executable was published.
    pub installed: Option<PathBuf>,
    /// The produced archive, if the target packages one.
    pub archive: Option<PackageReport>,
    pub steps: Vec<StepTiming>,
    /// Total pipeline duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildReport {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Build Report ===")?;
        writeln!(f, "Target: {}", self.target)?;
        if let Some(id) = &self.platform_id {
            writeln!(f, "Platform: {id}")?;
        }
        writeln!(f, "Backend: {}", self.backend)?;
        if !self.build_version.is_empty() {
            writeln!(f, "Version: {}", self.build_version)?;
        }
        writeln!(f, "Duration: {} ms", self.duration_ms)?;

        writeln!(f)?;
        writeln!(f, "--- Steps ---")?;
        for timing in &self.steps {
            writeln!(f, "  {:<9} {:>6} ms", timing.step, timing.duration_ms)?;
        }

        writeln!(f)?;
        writeln!(f, "--- Outputs ---")?;
        writeln!(
            f,
            "  Artifact: {} ({} sources)",
            self.artifact.display(),
            self.sources
        )?;
        if let Some(installed) = &self.installed {
            writeln!(f, "  Installed: {}", installed.display())?;
        }
        if let Some(archive) = &self.archive {
            writeln!(f, "  Archive: {}", archive.archive.display())?;
            writeln!(f, "  Entries: {}", archive.entries.join(", "))?;
            writeln!(f, "  SHA-256: {}", archive.sha256)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BuildReport {
        BuildReport {
            target: "unix".into(),
            platform_id: Some("tridium-generic-unix".into()),
            backend: "gcc".into(),
            build_version: "1.2.28".into(),
            sources: 12,
            artifact: PathBuf::from("/h/platforms/src/generic/unix/svm"),
            installed: Some(PathBuf::from("/h/bin/svm")),
            archive: None,
            steps: vec![
                StepTiming {
                    step: Step::Resolve,
                    duration_ms: 1,
                },
                StepTiming {
                    step: Step::Compile,
                    duration_ms: 950,
                },
            ],
            duration_ms: 1200,
        }
    }

    #[test]
    fn report_display() {
        let text = report().to_string();
        assert!(text.contains("=== Build Report ==="));
        assert!(text.contains("Target: unix"));
        assert!(text.contains("Platform: tridium-generic-unix"));
        assert!(text.contains("compile"));
        assert!(text.contains("Installed: /h/bin/svm"));
        assert!(!text.contains("Archive:"));
    }

    #[test]
    fn report_json() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["target"], "unix");
        assert_eq!(value["steps"][1]["step"], "compile");
        assert_eq!(value["steps"][1]["duration_ms"], 950);
        assert!(value["archive"].is_null());
    }
}
