//! End-to-end generation over fixture trees on disk.

use rulegen_core::{
    codes, render_build_file, ConfigRegistry, Error, ErrorScope, GenerateArgs, GenerateResult,
    Generator, Labels, RuleKind,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn generate(registry: &mut ConfigRegistry, rel: &str) -> Result<GenerateResult, Error> {
    let dir = registry.root().join(rel);
    let files = files_in(&dir);
    Generator::new(Labels::default()).generate(
        registry,
        &GenerateArgs {
            dir: &dir,
            rel,
            files: &files,
        },
    )
}

#[test]
fn test_monorepo_tree() {
    let root = tree(&[
        (
            "package.json",
            r#"{
                "dependencies": {"react": "18", "@tanstack/query": "5"},
                "devDependencies": {"@types/react": "18", "@types/node": "20", "vitest": "1"}
            }"#,
        ),
        ("libs/format/index.ts", "export function format() {}\n"),
        (
            "libs/format/index.test.ts",
            "import { describe } from 'vitest';\nimport { format } from './index';\n",
        ),
        (
            "apps/web/main.tsx",
            concat!(
                "import React from 'react';\n",
                "import { useQuery } from '@tanstack/query/react';\n",
                "import { format } from '/libs/format/index';\n",
                "import './app.css';\n",
            ),
        ),
        ("apps/web/vite.config.ts", "import path from 'node:path';\n"),
        ("apps/web/app.css", "body {}\n"),
        (
            "apps/web/Header.test.tsx",
            "import React from 'react';\nimport { Header } from 'apps/web/Header';\n",
        ),
    ]);
    let mut registry = ConfigRegistry::new(root.path());

    let lib = generate(&mut registry, "libs/format").unwrap();
    assert_eq!(lib.targets.len(), 2);
    assert_eq!(lib.targets[0].kind, RuleKind::TsLibrary);
    assert_eq!(lib.targets[0].srcs, ["index.ts"]);
    assert_eq!(lib.targets[1].name, "format_test");
    assert_eq!(lib.targets[1].deps, ["//:node_modules/vitest", ":format"]);

    let web = generate(&mut registry, "apps/web").unwrap();
    let app = web.library().unwrap();
    assert_eq!(app.kind, RuleKind::ViteApp);
    assert_eq!(app.name, "web");
    assert_eq!(app.srcs, ["main.tsx", "vite.config.ts"]);
    assert_eq!(app.data, ["app.css"]);
    assert_eq!(
        app.deps,
        [
            "//:node_modules/@tanstack/query",
            "//:node_modules/@types/node",
            "//:node_modules/@types/react",
            "//:node_modules/react",
            "//libs/format",
        ]
    );

    let test = web.tests().next().unwrap();
    assert_eq!(test.name, "web_component_test");
    assert_eq!(test.attrs["environment"], "jsdom");
    assert_eq!(
        test.deps,
        ["//:node_modules/@types/react", "//:node_modules/react", ":web"]
    );
}

#[test]
fn test_scoped_subpaths_resolve_to_package() {
    let root = tree(&[
        ("package.json", r#"{"dependencies": {"@scope/pkg": "1"}}"#),
        (
            "a/x.ts",
            "import a from '@scope/pkg';\nimport b from '@scope/pkg/sub/path';\n",
        ),
        ("a/y.ts", "export * from '@scope/pkg/other';\n"),
    ]);
    let mut registry = ConfigRegistry::new(root.path());

    let result = generate(&mut registry, "a").unwrap();
    assert_eq!(result.targets[0].deps, ["//:node_modules/@scope/pkg"]);
}

#[test]
fn test_sibling_import_only_counts_for_tests() {
    let root = tree(&[
        ("a/b/x.ts", "import { y } from './y';\n"),
        ("a/b/y.ts", "export const y = 1;\n"),
        ("a/b/x.spec.ts", "import { y } from './y';\nimport { x } from './x';\n"),
    ]);
    let mut registry = ConfigRegistry::new(root.path());

    let result = generate(&mut registry, "a/b").unwrap();
    assert!(result.library().unwrap().deps.is_empty());
    assert_eq!(result.tests().next().unwrap().deps, [":b"]);
}

#[test]
fn test_missing_manifest_is_empty() {
    let root = tree(&[("tools/main.js", "import fs from 'fs';\n")]);
    let mut registry = ConfigRegistry::new(root.path());

    let result = generate(&mut registry, "tools").unwrap();
    assert_eq!(result.targets[0].kind, RuleKind::JsBinary);
    // runtime types are only added when declared
    assert!(result.targets[0].deps.is_empty());
}

#[test]
fn test_malformed_manifest_aborts_run() {
    let root = tree(&[("package.json", "{ not json"), ("a/x.ts", "")]);
    let mut registry = ConfigRegistry::new(root.path());

    let err = generate(&mut registry, "a").unwrap_err();
    assert_eq!(err.code(), codes::MANIFEST_PARSE_FAILED);
    assert_eq!(err.scope(), ErrorScope::Run);
}

#[test]
fn test_unresolvable_import_loses_only_its_directory() {
    let root = tree(&[
        ("package.json", "{}"),
        ("bad/x.ts", "import lodash from 'lodash';\n"),
        ("good/x.ts", "import { y } from '../bad/x';\n"),
    ]);
    let mut registry = ConfigRegistry::new(root.path());

    let err = generate(&mut registry, "bad").unwrap_err();
    assert_eq!(err.code(), codes::IMPORT_UNRESOLVABLE);
    assert_eq!(err.scope(), ErrorScope::Directory);

    let good = generate(&mut registry, "good").unwrap();
    assert_eq!(good.targets[0].deps, ["//bad"]);
}

#[test]
fn test_directives_are_inherited() {
    let root = tree(&[("a/b/c/x.ts", "")]);
    let mut registry = ConfigRegistry::new(root.path());

    registry
        .configure("a", [("js_extension", "on"), ("exclude", "dist")])
        .unwrap();
    registry.configure("a/b", [("exclude", "build")]).unwrap();

    generate(&mut registry, "a/b/c").unwrap();
    let node = registry.get("a/b/c").unwrap();
    assert_eq!(node.directive("js_extension"), ["on"]);
    assert_eq!(node.directive("exclude"), ["build"]);
    assert_eq!(registry.get("a").unwrap().directive("exclude"), ["dist"]);
}

#[test]
fn test_rendered_build_file() {
    let root = tree(&[
        ("package.json", r#"{"dependencies": {"lodash": "1.0.0"}}"#),
        ("pkg/foo.spec.ts", "import _ from 'lodash';\n"),
        ("pkg/foo.ts", ""),
    ]);
    let mut registry = ConfigRegistry::new(root.path());

    let result = generate(&mut registry, "pkg").unwrap();
    let expected = r#"load("//bazel/ts:defs.bzl", "ts_library")
load("//bazel/vitest:defs.bzl", "vitest_test")

ts_library(
    name = "pkg",
    srcs = ["foo.ts"],
)

vitest_test(
    name = "pkg_test",
    srcs = ["foo.spec.ts"],
    deps = ["//:node_modules/lodash"],
)
"#;
    assert_eq!(render_build_file(&result), expected);
}

#[test]
fn test_json_shape() {
    let root = tree(&[("ui/Button.test.tsx", ""), ("ui/Button.tsx", "")]);
    let mut registry = ConfigRegistry::new(root.path());

    let result = generate(&mut registry, "ui").unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["package"], "ui");
    assert_eq!(json["targets"][0]["kind"], "ts_library");
    assert!(json["targets"][0].get("data").is_none());
    assert_eq!(json["targets"][1]["kind"], "vitest_test");
    assert_eq!(json["targets"][1]["attrs"]["environment"], "jsdom");
}
