//! Build identity of the generator, as printed by `rulegen version` and
//! embedded in JSON reports.

use serde::Serialize;
use std::fmt;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shape version of the JSON generation report (`packages`, `targets`,
/// `errors`). Generated BUILD files carry no version.
pub const SCHEMA_VERSION: u32 = 1;

/// Version details of this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub schema_version: u32,
    /// Commit the binary was built from, when the build exported
    /// `RULEGEN_BUILD_GIT_HASH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: VERSION,
            schema_version: SCHEMA_VERSION,
            git_hash: option_env!("RULEGEN_BUILD_GIT_HASH").filter(|h| !h.is_empty()),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rulegen {}", self.version)?;
        if let Some(hash) = self.git_hash {
            write!(f, " ({hash})")?;
        }
        Ok(())
    }
}

/// `rulegen <version>`, plus the commit when known.
#[must_use]
pub fn version_string() -> String {
    VersionInfo::current().to_string()
}
