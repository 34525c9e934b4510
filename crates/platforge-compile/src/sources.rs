//! Source entry resolution.
//!
//! Entries are relative to the work dir. `*` and `?` in the file-name
//! component expand to the sorted list of matching regular files, skipping
//! hidden files unless the pattern starts with `.`; an entry without
//! wildcards is passed through as-is.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{CompileError, Result};

fn has_wildcard(s: &str) -> bool {
    s.contains('*') || s.contains('?')
}

/// Translate a file-name wildcard into an anchored regular expression.
fn wildcard_regex(pattern: &str) -> String {
    let mut re = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    re
}

/// Resolve source entries against `base`.
pub fn resolve_sources(base: &Path, entries: &[String]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();
    for entry in entries {
        let path = Path::new(entry);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !has_wildcard(&file_name) {
            resolved.push(base.join(path));
            continue;
        }

        let dir = match path.parent() {
            Some(parent) => base.join(parent),
            None => base.to_path_buf(),
        };
        let regex = Regex::new(&wildcard_regex(&file_name)).map_err(|source| {
            CompileError::SourcePattern {
                pattern: entry.clone(),
                source,
            }
        })?;

        // Hidden files only match a pattern that itself starts with `.`.
        let include_hidden = file_name.starts_with('.');
        let mut matches = Vec::new();
        if dir.is_dir() {
            let read = std::fs::read_dir(&dir).map_err(|e| CompileError::io(&dir, e))?;
            for item in read {
                let item = item.map_err(|e| CompileError::io(&dir, e))?;
                let name = item.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') && !include_hidden {
                    continue;
                }
                if item.path().is_file() && regex.is_match(&name) {
                    matches.push(item.path());
                }
            }
        }
        if matches.is_empty() {
            return Err(CompileError::NoSources {
                pattern: entry.clone(),
                dir,
            });
        }
        matches.sort();
        log::debug!("{entry} -> {} file(s)", matches.len());
        resolved.extend(matches);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platforge_core::{Classify, FailureClass};
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn entries(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn star_expands_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("vm.c"));
        touch(&dir.path().join("errorcodes.c"));
        touch(&dir.path().join("sys_Sys.c"));
        touch(&dir.path().join("vm.h"));
        fs::create_dir(dir.path().join("dir.c")).unwrap();

        let srcs = resolve_sources(dir.path(), &entries(&["*.c"])).unwrap();
        let names: Vec<_> = srcs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["errorcodes.c", "sys_Sys.c", "vm.c"]);
    }

    #[test]
    fn question_mark_and_subdir() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("native/a1.c"));
        touch(&dir.path().join("native/a22.c"));
        let srcs = resolve_sources(dir.path(), &entries(&["native/a?.c"])).unwrap();
        assert_eq!(srcs, vec![dir.path().join("native/a1.c")]);
    }

    #[test]
    fn dot_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("vmXc"));
        let err = resolve_sources(dir.path(), &entries(&["vm*.c"])).unwrap_err();
        assert!(matches!(err, CompileError::NoSources { .. }));
    }

    #[test]
    fn wildcards_skip_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("vm.c"));
        touch(&dir.path().join(".vm.c"));
        touch(&dir.path().join(".#sys.c"));

        let srcs = resolve_sources(dir.path(), &entries(&["*.c"])).unwrap();
        assert_eq!(srcs, vec![dir.path().join("vm.c")]);

        let hidden = resolve_sources(dir.path(), &entries(&[".*.c"])).unwrap();
        assert_eq!(
            hidden,
            vec![dir.path().join(".#sys.c"), dir.path().join(".vm.c")]
        );
    }

    #[test]
    fn plain_entries_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let srcs = resolve_sources(dir.path(), &entries(&["main.c", "/abs/x.c"])).unwrap();
        assert_eq!(srcs[0], dir.path().join("main.c"));
        assert_eq!(srcs[1], PathBuf::from("/abs/x.c"));
    }

    #[test]
    fn empty_glob_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_sources(dir.path(), &entries(&["missing/*.c"])).unwrap_err();
        assert_eq!(err.class(), FailureClass::Validation);
    }
}
