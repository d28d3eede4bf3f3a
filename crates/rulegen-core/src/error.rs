use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, reported in JSON output.
pub mod codes {
    pub const MANIFEST_READ_FAILED: &str = "MANIFEST_READ_FAILED";
    pub const MANIFEST_PARSE_FAILED: &str = "MANIFEST_PARSE_FAILED";
    pub const MANIFEST_INVALID: &str = "MANIFEST_INVALID";
    pub const IMPORT_UNRESOLVABLE: &str = "IMPORT_UNRESOLVABLE";
    pub const NO_SOURCE_EVIDENCE: &str = "NO_SOURCE_EVIDENCE";
    pub const INTERNAL: &str = "INTERNAL";
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Nothing can be generated for the tree rooted at the manifest.
    Run,
    /// Only the directory being generated is lost; siblings continue.
    Directory,
}

/// Core error type for rulegen operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid manifest at {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("Cannot resolve import '{specifier}' in {file}: {reason}")]
    Resolution {
        file: String,
        specifier: String,
        reason: String,
    },

    #[error("Rule kind requested for package '{package}' without any source files")]
    NoSourceEvidence { package: String },

    #[error("{0}")]
    Internal(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a resolution error for `specifier` imported by `file`.
    #[must_use]
    pub fn unresolvable(
        file: impl Into<String>,
        specifier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Resolution {
            file: file.into(),
            specifier: specifier.into(),
            reason: reason.into(),
        }
    }

    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestRead { .. } => codes::MANIFEST_READ_FAILED,
            Self::ManifestParse { .. } => codes::MANIFEST_PARSE_FAILED,
            Self::ManifestInvalid { .. } => codes::MANIFEST_INVALID,
            Self::Resolution { .. } => codes::IMPORT_UNRESOLVABLE,
            Self::NoSourceEvidence { .. } => codes::NO_SOURCE_EVIDENCE,
            Self::Internal(_) => codes::INTERNAL,
            Self::Io { .. } => codes::IO_ERROR,
        }
    }

    /// Whether the failure aborts the whole run or only one directory.
    #[must_use]
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::ManifestRead { .. } | Self::ManifestParse { .. } | Self::ManifestInvalid { .. } => {
                ErrorScope::Run
            }
            Self::Resolution { .. }
            | Self::NoSourceEvidence { .. }
            | Self::Internal(_)
            | Self::Io { .. } => ErrorScope::Directory,
        }
    }
}
