use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the dependency manifest at the tree root.
pub const MANIFEST_FILE: &str = "package.json";

/// Build file names, in lookup order. Generated files use the first.
pub const BUILD_FILES: &[&str] = &["BUILD.bazel", "BUILD"];

/// Comment prefix of a directive line in a build file.
pub const DIRECTIVE_PREFIX: &str = "# gazelle:";

/// Runtime configuration for a rulegen run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the analyzed tree. Package paths are relative to it.
    pub root: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Reference string vocabulary for generated `deps`.
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            labels: Labels::default(),
        }
    }
}

impl Config {
    /// Create a new config rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Replace the label vocabulary.
    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }
}

/// How dependency references are spelled in generated targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Prefix for external registry packages, e.g. `//:node_modules/`.
    pub external_prefix: String,
    /// Prefix for packages elsewhere in the tree, e.g. `//`.
    pub tree_prefix: String,
    /// Prefix for a target in the same package, e.g. `:`.
    pub self_prefix: String,
    /// Type declarations for the runtime's built-in modules.
    pub runtime_types: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            external_prefix: "//:node_modules/".to_string(),
            tree_prefix: "//".to_string(),
            self_prefix: ":".to_string(),
            runtime_types: "@types/node".to_string(),
        }
    }
}

impl Labels {
    #[must_use]
    pub fn external(&self, package: &str) -> String {
        format!("{}{package}", self.external_prefix)
    }

    #[must_use]
    pub fn package(&self, package_path: &str) -> String {
        format!("{}{package_path}", self.tree_prefix)
    }

    #[must_use]
    pub fn same_package(&self, target: &str) -> String {
        format!("{}{target}", self.self_prefix)
    }
}
