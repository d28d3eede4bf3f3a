use super::{classify, RolePattern};
use std::path::{Path, PathBuf};

/// A classified file in the directory being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileRecord {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Package path of the enclosing directory.
    pub package: String,
    /// Path relative to the tree root.
    pub rel: String,
    /// Base name; also the path relative to the enclosing package.
    pub name: String,
    pub pattern: RolePattern,
    pub is_entry: bool,
}

impl SourceFileRecord {
    #[must_use]
    pub fn new(dir: &Path, package: &str, name: &str, pattern: RolePattern) -> Self {
        let rel = if package.is_empty() {
            name.to_string()
        } else {
            format!("{package}/{name}")
        };
        Self {
            path: dir.join(name),
            package: package.to_string(),
            rel,
            name: name.to_string(),
            pattern,
            is_entry: pattern.is_entry(name),
        }
    }

    #[must_use]
    pub fn is_test(&self) -> bool {
        self.pattern.is_test()
    }

    #[must_use]
    pub fn is_asset(&self) -> bool {
        self.pattern.is_asset()
    }

    /// Library/binary source: neither a test nor an asset.
    #[must_use]
    pub fn is_source(&self) -> bool {
        self.pattern.tier().is_some()
    }
}

/// Classify the regular files of one directory, keeping input order.
///
/// Files no pattern accepts are dropped.
#[must_use]
pub fn classify_files(dir: &Path, package: &str, files: &[String]) -> Vec<SourceFileRecord> {
    files
        .iter()
        .filter_map(|name| {
            classify(name).map(|pattern| SourceFileRecord::new(dir, package, name, pattern))
        })
        .collect()
}
