//! Dependency manifest (`package.json`) reader.
//!
//! Only the presence of a package name matters; version ranges are kept
//! as opaque strings and never interpreted.

use crate::config::MANIFEST_FILE;
use crate::error::Error;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const RUNTIME_SECTION: &str = "dependencies";
const DEV_SECTION: &str = "devDependencies";

/// Which manifest section a package was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepSection {
    Runtime,
    Dev,
}

/// A recoverable problem found while reading a manifest section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestWarning {
    /// Section name (`dependencies`, `devDependencies`).
    pub section: &'static str,
    /// Offending package name, if the problem is per-entry.
    pub name: Option<String>,
    pub message: String,
}

/// Direct and development dependencies declared at the tree root.
#[derive(Debug, Clone, Default)]
pub struct DependencyManifest {
    runtime: HashMap<String, String>,
    dev: HashMap<String, String>,
    warnings: Vec<ManifestWarning>,
}

impl DependencyManifest {
    /// An empty manifest: every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read `package.json` from `root`.
    ///
    /// A missing file yields an empty manifest. Unreadable files, malformed
    /// JSON, and a non-object document are errors.
    pub fn read(root: &Path) -> Result<Self, Error> {
        let path = root.join(MANIFEST_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "no manifest, using empty dependency set");
            return Ok(Self::empty());
        }

        let content = fs::read_to_string(&path).map_err(|source| Error::ManifestRead {
            path: path.clone(),
            source,
        })?;

        let manifest = Self::parse(&content, &path)?;
        for w in &manifest.warnings {
            warn!(
                path = %path.display(),
                section = w.section,
                name = w.name.as_deref().unwrap_or(""),
                "{}",
                w.message
            );
        }
        Ok(manifest)
    }

    /// Parse manifest text. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let doc: Value = serde_json::from_str(content).map_err(|source| Error::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

        let root = doc.as_object().ok_or_else(|| Error::ManifestInvalid {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, got {}", json_type_name(&doc)),
        })?;

        let mut warnings = Vec::new();
        let runtime = read_section(root, RUNTIME_SECTION, &mut warnings);
        let dev = read_section(root, DEV_SECTION, &mut warnings);
        Ok(Self {
            runtime,
            dev,
            warnings,
        })
    }

    /// Section declaring `name`, runtime first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<DepSection> {
        if self.runtime.contains_key(name) {
            Some(DepSection::Runtime)
        } else if self.dev.contains_key(name) {
            Some(DepSection::Dev)
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of distinct declared package names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runtime.len() + self.dev.keys().filter(|k| !self.runtime.contains_key(*k)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.dev.is_empty()
    }

    #[must_use]
    pub fn warnings(&self) -> &[ManifestWarning] {
        &self.warnings
    }
}

fn read_section(
    root: &Map<String, Value>,
    section: &'static str,
    warnings: &mut Vec<ManifestWarning>,
) -> HashMap<String, String> {
    let mut out = HashMap::new();

    let Some(value) = root.get(section) else {
        return out;
    };

    let Some(entries) = value.as_object() else {
        warnings.push(ManifestWarning {
            section,
            name: None,
            message: format!("'{section}' must be an object, got {}", json_type_name(value)),
        });
        return out;
    };

    for (name, range) in entries {
        match range.as_str() {
            Some(range) => {
                out.insert(name.clone(), range.to_string());
            }
            None => warnings.push(ManifestWarning {
                section,
                name: Some(name.clone()),
                message: format!("version must be a string, got {}", json_type_name(range)),
            }),
        }
    }

    out
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
