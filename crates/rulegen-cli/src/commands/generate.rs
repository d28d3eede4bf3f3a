//! `rulegen generate` command implementation.
//!
//! Walks the tree parent-before-child, feeds each directory's build file
//! directives and regular files to the generator, and prints the targets
//! as Starlark (default) or JSON.

use miette::{miette, IntoDiagnostic, Result};
use rulegen_core::paths::relative_to;
use rulegen_core::{
    parse_directives, render_build_file, Config, ConfigRegistry, Error, ErrorScope, GenerateArgs,
    GenerateResult, Generator, BUILD_FILES, SCHEMA_VERSION,
};
use rulegen_util::fs::{first_existing, read_source, write_atomic};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Prefix of the build tool's output symlinks at the workspace root.
const OUTPUT_DIR_PREFIX: &str = "bazel-";

/// A directory that produced no targets because of an error.
#[derive(Debug, Serialize)]
struct DirectoryError {
    package: String,
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    ok: bool,
    schema_version: u32,
    packages: &'a [GenerateResult],
    errors: &'a [DirectoryError],
}

/// Run the generate command.
pub fn run(config: &Config, dirs: &[PathBuf], write: bool, json: bool) -> Result<()> {
    let root = fs::canonicalize(&config.root).into_diagnostic()?;
    let visit = directories(&root, dirs)?;
    info!(root = %root.display(), directories = visit.len(), "generating");

    let mut session = Session::new(&root, Generator::new(config.labels.clone()));
    let mut packages = Vec::new();
    let mut errors = Vec::new();

    for dir in &visit {
        let Some(rel) = relative_to(&root, dir) else {
            return Err(miette!("{} is outside the tree root {}", dir.display(), root.display()));
        };

        let outcome = session.generate_dir(dir, &rel).and_then(|result| {
            if write && !result.is_empty() {
                write_build_file(dir, &result)?;
            }
            Ok(result)
        });

        match outcome {
            Ok(result) if result.is_empty() => {}
            Ok(result) => packages.push(result),
            Err(err) if err.scope() == ErrorScope::Run => fail(&err, json),
            Err(err) => {
                warn!(package = %rel, code = err.code(), "{err}");
                errors.push(DirectoryError {
                    package: rel,
                    code: err.code(),
                    message: err.to_string(),
                });
            }
        }
    }

    if json {
        let report = Report {
            ok: errors.is_empty(),
            schema_version: SCHEMA_VERSION,
            packages: &packages,
            errors: &errors,
        };
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    } else {
        for (i, result) in packages.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("# //{}", result.package);
            print!("{}", render_build_file(result));
        }
        for error in &errors {
            eprintln!("error: {}", error.message);
        }
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Per-run state shared by every visited directory.
struct Session<'a> {
    root: &'a Path,
    registry: ConfigRegistry,
    generator: Generator,
    /// Package paths whose build file directives were already applied.
    configured: HashSet<String>,
}

impl<'a> Session<'a> {
    fn new(root: &'a Path, generator: Generator) -> Self {
        Self::with_registry(root, ConfigRegistry::new(root), generator)
    }

    fn with_registry(root: &'a Path, registry: ConfigRegistry, generator: Generator) -> Self {
        Self {
            root,
            registry,
            generator,
            configured: HashSet::new(),
        }
    }

    fn generate_dir(&mut self, dir: &Path, rel: &str) -> Result<GenerateResult, Error> {
        self.configure_chain(rel)?;

        let files = regular_files(dir)?;
        self.generator.generate(
            &mut self.registry,
            &GenerateArgs {
                dir,
                rel,
                files: &files,
            },
        )
    }

    /// Apply build file directives of `rel` and each of its ancestors,
    /// root first, so a node never exists before its parent's directives.
    fn configure_chain(&mut self, rel: &str) -> Result<(), Error> {
        let mut prefix = String::new();
        let segments = rel.split('/').filter(|s| !s.is_empty());
        for segment in std::iter::once("").chain(segments) {
            if !segment.is_empty() {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(segment);
            }
            if !self.configured.insert(prefix.clone()) {
                continue;
            }

            let dir = self.root.join(&prefix);
            if let Some(build_file) = first_existing(&dir, BUILD_FILES) {
                let content = read_source(&build_file).map_err(|e| Error::io(&build_file, e))?;
                self.registry.configure(&prefix, parse_directives(&content))?;
            }
        }
        Ok(())
    }
}

/// Existing build files are left alone; only fresh directories get one.
fn write_build_file(dir: &Path, result: &GenerateResult) -> Result<(), Error> {
    if let Some(existing) = first_existing(dir, BUILD_FILES) {
        info!(path = %existing.display(), "build file exists, not overwriting");
        return Ok(());
    }
    let path = dir.join(BUILD_FILES[0]);
    write_atomic(&path, render_build_file(result).as_bytes()).map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), "wrote build file");
    Ok(())
}

/// Sorted base names of the regular files directly in `dir`.
fn regular_files(dir: &Path) -> Result<Vec<String>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.file_type().map_err(|e| Error::io(entry.path(), e))?.is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// Directories to visit, parents before children, each once.
fn directories(root: &Path, starts: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut starts = if starts.is_empty() {
        vec![root.to_path_buf()]
    } else {
        starts
            .iter()
            .map(|s| fs::canonicalize(root.join(s)).into_diagnostic())
            .collect::<Result<Vec<_>>>()?
    };
    starts.sort_by_key(|s| s.components().count());

    let mut seen = HashSet::new();
    let mut visit = Vec::new();
    for start in starts {
        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e));
        for entry in walker {
            let entry = entry.into_diagnostic()?;
            if entry.file_type().is_dir() && seen.insert(entry.path().to_path_buf()) {
                visit.push(entry.into_path());
            }
        }
    }
    Ok(visit)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir()
        && (SKIPPED_DIRS.contains(&&*name)
            || name.starts_with(OUTPUT_DIR_PREFIX)
            || name.starts_with('.'))
}

/// Report a run-scope error and exit.
fn fail(err: &Error, json: bool) -> ! {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                }
            })
        );
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}
