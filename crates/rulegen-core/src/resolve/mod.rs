//! Import resolution.
//!
//! Maps one import specifier of one file to zero or more [`DepRef`]s.
//! Three domains, picked by the specifier's first character:
//!
//! - external (`lodash`, `@scope/pkg/sub`): looked up in the manifest;
//!   runtime built-ins map to the runtime's type package only. A miss falls
//!   through to the tree-absolute domain for unregistered monorepo packages.
//! - relative (`./x`, `../y/z`): joined onto the importing file's package.
//! - tree-absolute (`/a/b/file`): the last segment is a file name, the rest
//!   is a package path.
//!
//! Resolution is read-only; results accumulate into a set, so the order in
//! which files and imports are visited does not matter.

mod builtins;

pub use builtins::{is_builtin, BUILTIN_MODULES, BUILTIN_SCHEME};

use crate::classify::SourceFileRecord;
use crate::error::Error;
use crate::manifest::DependencyManifest;
use crate::paths;
use std::collections::BTreeSet;
use tracing::{debug, warn};

const TYPES_SCOPE: &str = "@types/";

/// A resolved dependency, before it is spelled as a label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepRef {
    /// Package from the external registry, by package name.
    External(String),
    /// Another package in the tree, by package path.
    Package(String),
    /// The library target of the importing file's own package.
    SameLibrary,
}

/// Resolution domain of a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    External,
    Relative,
    TreeAbsolute,
}

impl Domain {
    #[must_use]
    pub fn of(specifier: &str) -> Self {
        if specifier.starts_with('.') {
            Self::Relative
        } else if specifier.starts_with('/') {
            Self::TreeAbsolute
        } else {
            Self::External
        }
    }
}

/// Registry package name of a bare specifier: `@scope/name` or `name`.
#[must_use]
pub fn package_name(specifier: &str) -> &str {
    let mut slashes = specifier.match_indices('/').map(|(i, _)| i);
    let end = if specifier.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };
    end.map_or(specifier, |i| &specifier[..i])
}

/// Companion type-declaration package for `package`.
///
/// Scoped names use the `@types/scope__name` convention. Packages already
/// in `@types` have no companion.
#[must_use]
pub fn types_package(package: &str) -> Option<String> {
    if package.starts_with(TYPES_SCOPE) {
        return None;
    }
    match package.strip_prefix('@').and_then(|p| p.split_once('/')) {
        Some((scope, name)) => Some(format!("{TYPES_SCOPE}{scope}__{name}")),
        None => Some(format!("{TYPES_SCOPE}{package}")),
    }
}

/// Specifiers that point outside any package system.
fn is_url_like(specifier: &str) -> bool {
    specifier.contains("://") || specifier.starts_with("data:")
}

/// Relative specifiers like `.`, `..` or `./dir/` name a directory, not a file.
fn names_directory(specifier: &str) -> bool {
    specifier.ends_with('/') || matches!(specifier.rsplit('/').next(), Some("." | ".."))
}

/// Resolves specifiers against one manifest.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    manifest: &'a DependencyManifest,
    runtime_types: &'a str,
}

impl<'a> Resolver<'a> {
    /// `runtime_types` is the package providing types for built-ins.
    #[must_use]
    pub fn new(manifest: &'a DependencyManifest, runtime_types: &'a str) -> Self {
        Self {
            manifest,
            runtime_types,
        }
    }

    /// Resolve `specifier`, imported by `record`, into `deps`.
    ///
    /// Fails only when a path inside the tree has no package part, i.e. the
    /// specifier is neither a declared package nor a locatable tree path.
    pub fn resolve(
        &self,
        record: &SourceFileRecord,
        specifier: &str,
        deps: &mut BTreeSet<DepRef>,
    ) -> Result<(), Error> {
        if is_url_like(specifier) {
            debug!(file = %record.rel, specifier, "skipping url import");
            return Ok(());
        }

        match Domain::of(specifier) {
            Domain::Relative => Self::resolve_relative(record, specifier, deps),
            Domain::TreeAbsolute => Self::resolve_tree_path(
                record,
                specifier,
                specifier.trim_start_matches('/'),
                deps,
            ),
            Domain::External => {
                if self.resolve_external(specifier, deps) {
                    return Ok(());
                }
                Self::resolve_tree_path(record, specifier, specifier, deps)
            }
        }
    }

    /// Returns `false` when the manifest does not know the package.
    fn resolve_external(&self, specifier: &str, deps: &mut BTreeSet<DepRef>) -> bool {
        let name = package_name(specifier);

        if is_builtin(name) {
            if self.manifest.contains(self.runtime_types) {
                deps.insert(DepRef::External(self.runtime_types.to_string()));
            }
            return true;
        }

        if !self.manifest.contains(name) {
            return false;
        }
        deps.insert(DepRef::External(name.to_string()));

        if let Some(types) = types_package(name).filter(|t| self.manifest.contains(t)) {
            deps.insert(DepRef::External(types));
        }
        true
    }

    /// The root package has no label of its own, so reaching it from
    /// another package is an error.
    fn resolve_relative(
        record: &SourceFileRecord,
        specifier: &str,
        deps: &mut BTreeSet<DepRef>,
    ) -> Result<(), Error> {
        let Some(target) = paths::join(&record.package, specifier) else {
            warn!(file = %record.rel, specifier, "relative import escapes the tree root");
            return Ok(());
        };

        let package = if names_directory(specifier) {
            target
        } else {
            paths::parent(&target).to_string()
        };
        if package.is_empty() && !record.package.is_empty() {
            return Err(Error::unresolvable(
                &record.rel,
                specifier,
                "relative path resolves to the tree root, which is not a package",
            ));
        }
        add_package(record, package, deps);
        Ok(())
    }

    fn resolve_tree_path(
        record: &SourceFileRecord,
        specifier: &str,
        path: &str,
        deps: &mut BTreeSet<DepRef>,
    ) -> Result<(), Error> {
        let Some(folded) = paths::join("", path) else {
            return Err(Error::unresolvable(
                &record.rel,
                specifier,
                "tree path climbs above the root",
            ));
        };
        let package = paths::parent(&folded);

        if package.is_empty() {
            let reason = if Domain::of(specifier) == Domain::External {
                "not a declared dependency and not a path inside the tree"
            } else {
                "tree path has no package directory"
            };
            return Err(Error::unresolvable(&record.rel, specifier, reason));
        }

        add_package(record, package.to_string(), deps);
        Ok(())
    }
}

/// A same-package import only matters to tests, which live in their own
/// target and must depend on the library rather than copy its sources.
fn add_package(record: &SourceFileRecord, package: String, deps: &mut BTreeSet<DepRef>) {
    if package != record.package {
        deps.insert(DepRef::Package(package));
    } else if record.is_test() {
        deps.insert(DepRef::SameLibrary);
    }
}
