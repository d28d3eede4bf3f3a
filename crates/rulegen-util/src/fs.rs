use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const UTF8_BOM: char = '\u{FEFF}';

/// Read a source file as text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD and a leading byte
/// order mark is dropped, so line-oriented scanners see the first line as
/// written.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text
        .strip_prefix(UTF8_BOM)
        .map_or_else(|| text.to_string(), str::to_string))
}

/// Return the first of `names` that exists as a regular file under `dir`.
#[must_use]
pub fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Replace `path` with `bytes` without exposing a half-written file.
///
/// The contents go to a hidden sibling first (see [`staging_path`]) and are
/// renamed over `path` once flushed, so a build tool reading the tree
/// concurrently never parses a truncated BUILD file. The sibling is removed
/// if any step fails.
///
/// # Errors
/// Returns an error if the sibling cannot be written or renamed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let staging = staging_path(path);
    let result = stage(&staging, bytes).and_then(|()| fs::rename(&staging, path));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

/// Hidden sibling of `path` used while writing it. The process id keeps
/// two concurrent runs over the same tree apart.
#[must_use]
pub fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "BUILD".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.rulegen-{}", std::process::id()))
}

fn stage(staging: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(staging)?;
    file.write_all(bytes)?;
    file.sync_all()
}
