//! Minimal `.properties` reader.
//!
//! Supports `key=value` lines, `#` and `!` comments and blank lines. Lines
//! without `=` are ignored. Keys and values are trimmed.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{BuildError, Result};

pub type Properties = BTreeMap<String, String>;

/// Parse properties text.
pub fn parse(text: &str) -> Properties {
    let mut props = Properties::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            props.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    props
}

/// Load a properties file.
pub fn load(path: &Path) -> Result<Properties> {
    let text = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    Ok(parse(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_properties() {
        let props = parse(
            "# Sedona properties\n\
             buildVersion=1.2.28\n\
             \n\
             ! also a comment\n\
             sedona.platform = tridium-generic-unix \n\
             garbage line\n\
             url=http://x/?a=b\n",
        );
        assert_eq!(props.len(), 3);
        assert_eq!(props["buildVersion"], "1.2.28");
        assert_eq!(props["sedona.platform"], "tridium-generic-unix");
        assert_eq!(props["url"], "http://x/?a=b");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("sedona.properties")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
