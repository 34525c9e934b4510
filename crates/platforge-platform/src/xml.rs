//! Shared XML loading helpers.

use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{PlatformError, Result};

/// Root element of a platform descriptor.
pub const PLATFORM_ROOT: &str = "sedonaPlatform";

/// Root element of a platform manifest.
pub const MANIFEST_ROOT: &str = "platformManifest";

/// Read a document's text, mapping a missing file to `NotFound`.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(PlatformError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| PlatformError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse<'a>(text: &'a str, path: &Path) -> Result<Document<'a>> {
    Document::parse(text).map_err(|source| PlatformError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

/// Return the root element if its name is `expected`.
pub(crate) fn expect_root<'a, 'input>(
    doc: &'a Document<'input>,
    expected: &'static str,
    path: &Path,
) -> Result<Node<'a, 'input>> {
    let root = doc.root_element();
    if root.tag_name().name() != expected {
        return Err(PlatformError::WrongRoot {
            path: path.to_path_buf(),
            expected,
            found: root.tag_name().name().to_string(),
        });
    }
    Ok(root)
}

/// Parse an optional numeric attribute.
pub(crate) fn attr_u32(node: Node<'_, '_>, name: &'static str, path: &Path) -> Result<Option<u32>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PlatformError::InvalidAttribute {
                path: path.to_path_buf(),
                attribute: name,
                value: raw.to_string(),
            }),
    }
}

/// Parse an optional boolean attribute (`true` / `false`), defaulting to false.
pub(crate) fn attr_bool(node: Node<'_, '_>, name: &'static str, path: &Path) -> Result<bool> {
    match node.attribute(name) {
        None => Ok(false),
        Some(raw) => match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(PlatformError::InvalidAttribute {
                path: path.to_path_buf(),
                attribute: name,
                value: raw.to_string(),
            }),
        },
    }
}

/// Child elements of `node` with the given tag name.
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}
