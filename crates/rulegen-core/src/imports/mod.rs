//! Import discovery for JavaScript/TypeScript files.
//!
//! Extraction is lexical. [`ImportScanner`] is the seam a syntax-aware
//! parser would plug into; resolution only ever sees [`ImportSpec`]s.

mod scan;

pub use scan::LineScanner;

/// Kind of statement an import specifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from "spec"`, `import type { T } from "spec"`.
    Import,
    /// `import "spec"`.
    SideEffect,
    /// `export { x } from "spec"`, `export * from "spec"`.
    ReExport,
}

/// Import specifier found in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Module specifier exactly as written between the quotes.
    pub specifier: String,
    pub kind: ImportKind,
    /// Line of the statement's first line (1-indexed).
    pub line: u32,
}

impl ImportSpec {
    #[must_use]
    pub fn new(specifier: impl Into<String>, kind: ImportKind, line: u32) -> Self {
        Self {
            specifier: specifier.into(),
            kind,
            line,
        }
    }
}

/// Extracts import specifiers from source text.
pub trait ImportScanner {
    /// Specifiers in first-appearance order, deduplicated by specifier.
    fn scan(&self, source: &str) -> Vec<ImportSpec>;
}
