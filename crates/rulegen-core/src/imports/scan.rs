//! Line-oriented import scanner.
//!
//! A statement is a candidate when its line starts with `import` or
//! `export`. The specifier is the quoted literal after the last `from`
//! keyword; anything after the closing quote (`;`, comments, import
//! attributes) is ignored. Lines that do not fit are skipped silently.

use super::{ImportKind, ImportScanner, ImportSpec};
use std::collections::HashSet;

/// Longest multi-line import clause we keep waiting on.
const MAX_CLAUSE_LINES: u32 = 200;

/// The default [`ImportScanner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LineScanner;

impl ImportScanner for LineScanner {
    fn scan(&self, source: &str) -> Vec<ImportSpec> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();
        let mut emit = |spec: String, kind: ImportKind, line: u32| {
            if !spec.is_empty() && seen.insert(spec.clone()) {
                results.push(ImportSpec::new(spec, kind, line));
            }
        };

        // Open `import {` clause waiting for its `from` line.
        let mut pending: Option<(u32, ImportKind)> = None;

        for (idx, raw) in source.lines().enumerate() {
            let line_num = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            let line = strip_line_comment(raw.trim());

            if let Some((start, kind)) = pending {
                // a new statement abandons the open clause
                if statement_keyword(line).is_none() {
                    if let Some(spec) = from_clause(line) {
                        emit(spec, kind, start);
                        pending = None;
                        continue;
                    }
                    if !line.contains(';') && line_num - start < MAX_CLAUSE_LINES {
                        continue;
                    }
                }
                pending = None;
            }

            let Some((kind, rest)) = statement_keyword(line) else {
                continue;
            };
            let rest = rest.trim_start();

            if kind == ImportKind::Import {
                // `import("x")` is a call, `import.meta` a property
                if rest.starts_with('(') || rest.starts_with('.') {
                    continue;
                }
                if let Some(spec) = quoted(rest) {
                    emit(spec, ImportKind::SideEffect, line_num);
                    continue;
                }
            }

            if let Some(spec) = from_clause(rest) {
                emit(spec, kind, line_num);
            } else if opens_clause(rest) {
                pending = Some((line_num, kind));
            }
        }

        results
    }
}

/// Match a leading `import`/`export` keyword, returning the remainder.
fn statement_keyword(line: &str) -> Option<(ImportKind, &str)> {
    for (keyword, kind) in [("import", ImportKind::Import), ("export", ImportKind::ReExport)] {
        if let Some(rest) = line.strip_prefix(keyword) {
            if !rest.starts_with(is_ident_char) {
                return Some((kind, rest));
            }
        }
    }
    None
}

/// A clause like `import {` or `export {` whose specifier is on a later line.
fn opens_clause(rest: &str) -> bool {
    rest.contains('{') && !rest.contains('}') && !rest.contains(';')
}

/// Quoted literal after the last `from` keyword in `text`.
fn from_clause(text: &str) -> Option<String> {
    text.rmatch_indices("from")
        .filter(|(pos, _)| {
            text[..*pos]
                .chars()
                .next_back()
                .map_or(true, |c| !is_ident_char(c))
        })
        .find_map(|(pos, kw)| quoted(text[pos + kw.len()..].trim_start()))
}

/// Contents of a string literal at the start of `text`.
fn quoted(text: &str) -> Option<String> {
    let quote = text.chars().next().filter(|&c| matches!(c, '"' | '\'' | '`'))?;
    let body = &text[quote.len_utf8()..];
    let end = body.find(quote)?;
    Some(body[..end].to_string())
}

/// Drop a trailing `//` comment that is not inside a string literal.
fn strip_line_comment(line: &str) -> &str {
    let mut in_quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in line.char_indices() {
        match in_quote {
            Some(q) if c == q => in_quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '\'' | '`') => in_quote = Some(c),
            None if c == '/' && prev == '/' => return line[..i - 1].trim_end(),
            None => {}
        }
        prev = c;
    }
    line
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
