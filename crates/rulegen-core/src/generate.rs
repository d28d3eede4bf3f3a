//! Rule assembly.
//!
//! One directory in, its targets out: at most one library/binary target
//! holding every source file, plus one combined test target per test family
//! present. Tests depend on the co-located library instead of re-listing
//! its sources.

use crate::classify::{classify_files, SourceFileRecord, PRECEDENCE};
use crate::config::Labels;
use crate::error::Error;
use crate::hierarchy::ConfigRegistry;
use crate::imports::{ImportScanner, LineScanner};
use crate::infer::infer_rule_kind;
use crate::kind::RuleKind;
use crate::paths;
use crate::resolve::{DepRef, Resolver};
use rulegen_util::fs::read_source;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Input for one directory.
#[derive(Debug, Clone, Copy)]
pub struct GenerateArgs<'a> {
    /// Absolute path of the directory.
    pub dir: &'a Path,
    /// Package path of the directory relative to the tree root.
    pub rel: &'a str,
    /// Base names of the directory's regular files, in the order to emit them.
    pub files: &'a [String],
}

/// A synthesized build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub kind: RuleKind,
    pub name: String,
    pub srcs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,
    /// Sorted, deduplicated dependency labels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

/// Targets generated for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateResult {
    pub package: String,
    pub targets: Vec<Target>,
}

impl GenerateResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The library, binary, or app target, if any.
    #[must_use]
    pub fn library(&self) -> Option<&Target> {
        self.targets.iter().find(|t| !t.kind.is_test())
    }

    pub fn tests(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.kind.is_test())
    }
}

/// Generates targets directory by directory.
#[derive(Debug, Clone, Default)]
pub struct Generator<S = LineScanner> {
    scanner: S,
    labels: Labels,
}

impl Generator<LineScanner> {
    #[must_use]
    pub fn new(labels: Labels) -> Self {
        Self::with_scanner(LineScanner, labels)
    }
}

impl<S: ImportScanner> Generator<S> {
    /// Use a different import extractor.
    #[must_use]
    pub fn with_scanner(scanner: S, labels: Labels) -> Self {
        Self { scanner, labels }
    }

    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Generate the targets for one directory.
    ///
    /// A directory without sources or tests yields an empty result. Any
    /// resolution error discards the whole directory; the registry keeps
    /// only the nodes it created on the way.
    pub fn generate(
        &self,
        registry: &mut ConfigRegistry,
        args: &GenerateArgs<'_>,
    ) -> Result<GenerateResult, Error> {
        let package = paths::clean(args.rel);
        let manifest = registry.resolve(&package)?.manifest_handle();
        let records = classify_files(args.dir, &package, args.files);

        let sources: Vec<&SourceFileRecord> = records.iter().filter(|r| r.is_source()).collect();
        if sources.is_empty() && !records.iter().any(SourceFileRecord::is_test) {
            debug!(package = %package, "nothing to generate");
            return Ok(GenerateResult {
                package,
                targets: Vec::new(),
            });
        }

        let resolver = Resolver::new(&manifest, &self.labels.runtime_types);
        let base = target_base_name(&package, args.dir);
        let mut targets = Vec::new();
        // every asset lands in exactly one target: the library, or the
        // first test target when there is no library
        let mut assets: Vec<String> = records
            .iter()
            .filter(|r| r.is_asset())
            .map(|r| r.name.clone())
            .collect();

        let library = if sources.is_empty() {
            None
        } else {
            let kind = infer_rule_kind(&package, sources.iter().copied())?;
            let deps = self.collect_deps(&resolver, &sources)?;
            Some(Target {
                kind,
                name: base.clone(),
                srcs: names(&sources),
                data: std::mem::take(&mut assets),
                deps: self.spell(deps, None, &package),
                attrs: BTreeMap::new(),
            })
        };
        let library_name = library.as_ref().map(|t| t.name.clone());
        targets.extend(library);

        for pattern in PRECEDENCE {
            let Some(kind) = pattern.test_kind() else {
                continue;
            };
            let family: Vec<&SourceFileRecord> =
                records.iter().filter(|r| r.pattern == pattern).collect();
            if family.is_empty() {
                continue;
            }

            let deps = self.collect_deps(&resolver, &family)?;
            targets.push(Target {
                kind,
                name: format!("{base}{}", pattern.target_suffix()),
                srcs: names(&family),
                data: std::mem::take(&mut assets),
                deps: self.spell(deps, library_name.as_deref(), &package),
                attrs: pattern
                    .extra_attrs()
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            });
        }

        debug!(package = %package, targets = targets.len(), "generated");
        Ok(GenerateResult { package, targets })
    }

    /// Resolve every import of `records` into one set.
    fn collect_deps(
        &self,
        resolver: &Resolver<'_>,
        records: &[&SourceFileRecord],
    ) -> Result<BTreeSet<DepRef>, Error> {
        let mut deps = BTreeSet::new();
        for record in records {
            let source = match read_source(&record.path) {
                Ok(source) => source,
                Err(err) => {
                    debug!(file = %record.rel, error = %err, "unreadable, no imports contributed");
                    continue;
                }
            };
            for import in self.scanner.scan(&source) {
                resolver.resolve(record, &import.specifier, &mut deps)?;
            }
        }
        Ok(deps)
    }

    /// Turn resolved deps into sorted labels.
    fn spell(&self, deps: BTreeSet<DepRef>, library: Option<&str>, package: &str) -> Vec<String> {
        let labels: BTreeSet<String> = deps
            .into_iter()
            .filter_map(|dep| match dep {
                DepRef::External(name) => Some(self.labels.external(&name)),
                DepRef::Package(path) => Some(self.labels.package(&path)),
                DepRef::SameLibrary => {
                    if library.is_none() {
                        debug!(package, "same-package import without a library target");
                    }
                    library.map(|name| self.labels.same_package(name))
                }
            })
            .collect();
        labels.into_iter().collect()
    }
}

fn names(records: &[&SourceFileRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

/// Target name for a package: its last path segment, or the root
/// directory's own name for the root package.
fn target_base_name(package: &str, dir: &Path) -> String {
    if package.is_empty() {
        dir.file_name()
            .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned())
    } else {
        paths::base_name(package).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::DependencyManifest;
    use std::fs;
    use tempfile::tempdir;

    struct Fixture {
        dir: tempfile::TempDir,
        registry: ConfigRegistry,
    }

    impl Fixture {
        fn new(manifest: &str) -> Self {
            let dir = tempdir().unwrap();
            let manifest = DependencyManifest::parse(manifest, Path::new("package.json")).unwrap();
            let registry = ConfigRegistry::with_manifest(dir.path(), manifest);
            Self { dir, registry }
        }

        fn file(&self, rel: &str, content: &str) {
            let path = self.dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn generate(&mut self, rel: &str, files: &[&str]) -> Result<GenerateResult, Error> {
            let files: Vec<String> = files.iter().map(ToString::to_string).collect();
            let dir = self.dir.path().join(rel);
            Generator::new(Labels::default()).generate(
                &mut self.registry,
                &GenerateArgs {
                    dir: &dir,
                    rel,
                    files: &files,
                },
            )
        }
    }

    #[test]
    fn test_binary_with_main() {
        let mut fx = Fixture::new("{}");
        fx.file("app/main.ts", "import { helper } from './utils';\n");
        fx.file("app/utils.ts", "export const helper = 1;\n");

        let result = fx.generate("app", &["main.ts", "utils.ts"]).unwrap();
        assert_eq!(result.targets.len(), 1);
        let target = &result.targets[0];
        assert_eq!(target.kind, RuleKind::TsBinary);
        assert_eq!(target.name, "app");
        assert_eq!(target.srcs, ["main.ts", "utils.ts"]);
        assert!(target.deps.is_empty());
        assert!(target.data.is_empty());
    }

    #[test]
    fn test_library_keeps_input_order_and_assets() {
        let mut fx = Fixture::new("{}");
        fx.file("lib/z.ts", "");
        fx.file("lib/a.ts", "");
        fx.file("lib/style.css", "");

        let result = fx.generate("lib", &["z.ts", "style.css", "a.ts"]).unwrap();
        let lib = result.library().unwrap();
        assert_eq!(lib.kind, RuleKind::TsLibrary);
        assert_eq!(lib.srcs, ["z.ts", "a.ts"]);
        assert_eq!(lib.data, ["style.css"]);
    }

    #[test]
    fn test_only_assets_yields_nothing() {
        let mut fx = Fixture::new("{}");
        fx.file("styles/app.css", "");
        let result = fx.generate("styles", &["app.css", "README.md"]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.package, "styles");
    }

    #[test]
    fn test_assets_without_library_go_to_a_test() {
        let mut fx = Fixture::new("{}");
        fx.file("t/util.test.ts", "");
        fx.file("t/Card.test.tsx", "");
        fx.file("t/fixture.css", "");
        fx.file("t/icon.svg", "");

        let result = fx
            .generate("t", &["Card.test.tsx", "fixture.css", "icon.svg", "util.test.ts"])
            .unwrap();
        assert!(result.library().is_none());

        let mut placed: Vec<&str> = result
            .targets
            .iter()
            .flat_map(|t| t.srcs.iter().chain(&t.data))
            .map(String::as_str)
            .collect();
        placed.sort_unstable();
        assert_eq!(placed, ["Card.test.tsx", "fixture.css", "icon.svg", "util.test.ts"]);

        let with_data: Vec<&Target> = result.tests().filter(|t| !t.data.is_empty()).collect();
        assert_eq!(with_data.len(), 1);
        assert_eq!(with_data[0].name, "t_component_test");
        assert_eq!(with_data[0].data, ["fixture.css", "icon.svg"]);
    }

    #[test]
    fn test_spec_with_external_dep() {
        let mut fx = Fixture::new(r#"{"dependencies": {"lodash": "1.0.0"}}"#);
        fx.file("pkg/foo.spec.ts", "import _ from 'lodash';\n");

        let result = fx.generate("pkg", &["foo.spec.ts"]).unwrap();
        assert_eq!(result.targets.len(), 1);
        let test = &result.targets[0];
        assert_eq!(test.kind, RuleKind::VitestTest);
        assert_eq!(test.name, "pkg_test");
        assert_eq!(test.srcs, ["foo.spec.ts"]);
        assert_eq!(test.deps, ["//:node_modules/lodash"]);
    }

    #[test]
    fn test_test_depends_on_sibling_library() {
        let mut fx = Fixture::new(r#"{"devDependencies": {"vitest": "1"}}"#);
        fx.file("pkg/component.ts", "export class Counter {}\n");
        fx.file(
            "pkg/component.spec.ts",
            "import { expect } from 'vitest';\nimport { Counter } from './component';\n",
        );

        let result = fx.generate("pkg", &["component.ts", "component.spec.ts"]).unwrap();
        let lib = result.library().unwrap();
        assert_eq!(lib.srcs, ["component.ts"]);

        let test = result.tests().next().unwrap();
        assert_eq!(test.srcs, ["component.spec.ts"]);
        assert_eq!(test.deps, ["//:node_modules/vitest", ":pkg"]);
    }

    #[test]
    fn test_component_tests_get_dom_environment() {
        let mut fx = Fixture::new("{}");
        fx.file("ui/Button.test.tsx", "");
        fx.file("ui/util.test.ts", "");

        let result = fx.generate("ui", &["Button.test.tsx", "util.test.ts"]).unwrap();
        assert_eq!(result.targets.len(), 2);

        let component = result.targets.iter().find(|t| t.name == "ui_component_test").unwrap();
        assert_eq!(component.srcs, ["Button.test.tsx"]);
        assert_eq!(component.attrs.get("environment").map(String::as_str), Some("jsdom"));

        let unit = result.targets.iter().find(|t| t.name == "ui_test").unwrap();
        assert_eq!(unit.srcs, ["util.test.ts"]);
        assert!(unit.attrs.is_empty());
    }

    #[test]
    fn test_test_families_are_combined() {
        let mut fx = Fixture::new(r#"{"devDependencies": {"@playwright/test": "1"}}"#);
        fx.file("e2e/a.pw.spec.ts", "import { test } from '@playwright/test';\n");
        fx.file("e2e/b.pw.spec.js", "import { test } from '@playwright/test';\n");

        let result = fx.generate("e2e", &["a.pw.spec.ts", "b.pw.spec.js"]).unwrap();
        assert_eq!(result.targets.len(), 1);
        let target = &result.targets[0];
        assert_eq!(target.kind, RuleKind::PlaywrightTest);
        assert_eq!(target.name, "e2e_e2e_test");
        assert_eq!(target.srcs, ["a.pw.spec.ts", "b.pw.spec.js"]);
        assert_eq!(target.deps, ["//:node_modules/@playwright/test"]);
    }

    #[test]
    fn test_self_reference_dropped_without_library() {
        let mut fx = Fixture::new("{}");
        fx.file("pkg/component.spec.ts", "import { Counter } from 'pkg/component';\n");

        let result = fx.generate("pkg", &["component.spec.ts"]).unwrap();
        assert!(result.library().is_none());
        assert!(result.targets[0].deps.is_empty());
    }

    #[test]
    fn test_deps_are_deduplicated_across_files() {
        let mut fx = Fixture::new(
            r#"{"dependencies": {"chalk": "5"}, "devDependencies": {"@types/node": "20"}}"#,
        );
        fx.file("cli/main.ts", "import chalk from 'chalk';\nimport fs from 'fs';\n");
        fx.file("cli/log.ts", "import chalk from 'chalk';\nimport path from 'node:path';\n");
        fx.file("cli/fmt.ts", "import { f } from '../shared/fmt';\n");

        let result = fx.generate("cli", &["main.ts", "log.ts", "fmt.ts"]).unwrap();
        assert_eq!(
            result.targets[0].deps,
            ["//:node_modules/@types/node", "//:node_modules/chalk", "//shared"]
        );
    }

    #[test]
    fn test_unreadable_file_contributes_nothing() {
        let mut fx = Fixture::new("{}");
        fx.file("p/a.ts", "import x from '/lib/x/y';\n");
        // b.ts is listed but never written

        let result = fx.generate("p", &["a.ts", "b.ts"]).unwrap();
        assert_eq!(result.targets[0].srcs, ["a.ts", "b.ts"]);
        assert_eq!(result.targets[0].deps, ["//lib/x"]);
    }

    #[test]
    fn test_resolution_error_aborts_directory() {
        let mut fx = Fixture::new("{}");
        fx.file("p/a.ts", "import React from 'react';\n");

        let err = fx.generate("p", &["a.ts"]).unwrap_err();
        assert!(err.to_string().contains("p/a.ts"));
        assert!(err.to_string().contains("'react'"));

        // the registry stays usable for sibling directories
        fx.file("q/b.ts", "");
        assert_eq!(fx.generate("q", &["b.ts"]).unwrap().targets.len(), 1);
    }

    #[test]
    fn test_root_package_uses_directory_name() {
        let mut fx = Fixture::new("{}");
        fx.file("index.js", "");
        let expected = fx.dir.path().file_name().unwrap().to_string_lossy().into_owned();

        let result = fx.generate("", &["index.js"]).unwrap();
        assert_eq!(result.targets[0].kind, RuleKind::JsLibrary);
        assert_eq!(result.targets[0].name, expected);
    }

    #[test]
    fn test_custom_scanner() {
        struct Fixed;
        impl ImportScanner for Fixed {
            fn scan(&self, _source: &str) -> Vec<crate::imports::ImportSpec> {
                vec![crate::imports::ImportSpec::new(
                    "/other/pkg/file",
                    crate::imports::ImportKind::Import,
                    1,
                )]
            }
        }

        let mut fx = Fixture::new("{}");
        fx.file("p/a.ts", "");
        let dir = fx.dir.path().join("p");
        let files = vec!["a.ts".to_string()];
        let result = Generator::with_scanner(Fixed, Labels::default())
            .generate(
                &mut fx.registry,
                &GenerateArgs {
                    dir: &dir,
                    rel: "p",
                    files: &files,
                },
            )
            .unwrap();
        assert_eq!(result.targets[0].deps, ["//other/pkg"]);
    }
}
