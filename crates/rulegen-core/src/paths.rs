//! Package path arithmetic.
//!
//! Package paths are `/`-separated and relative to the tree root; the root
//! itself is the empty string. All operations here are lexical and never
//! touch the filesystem.

use std::path::Path;

/// Normalize a package path: drop empty and `.` segments.
#[must_use]
pub fn clean(rel: &str) -> String {
    rel.split(['/', '\\'])
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Package path of the parent directory. The root is its own parent.
#[must_use]
pub fn parent(rel: &str) -> &str {
    rel.rsplit_once('/').map_or("", |(head, _)| head)
}

/// Last segment of a package path.
#[must_use]
pub fn base_name(rel: &str) -> &str {
    rel.rsplit_once('/').map_or(rel, |(_, tail)| tail)
}

/// Join `specifier` onto `base`, folding `.` and `..` segments.
///
/// Returns `None` if the result would climb above the tree root.
#[must_use]
pub fn join(base: &str, specifier: &str) -> Option<String> {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for seg in specifier.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(segments.join("/"))
}

/// Package path of `dir` relative to `root`, or `None` if it lies outside.
#[must_use]
pub fn relative_to(root: &Path, dir: &Path) -> Option<String> {
    let rel = dir.strip_prefix(root).ok()?;
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(clean(&segments.join("/")))
}
