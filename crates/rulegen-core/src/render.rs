//! Starlark rendering of generated targets.

use crate::generate::{GenerateResult, Target};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

const INDENT: &str = "    ";

/// Render a BUILD file fragment for one directory.
///
/// `load()` statements come first, one per load file, sorted; targets
/// follow in generation order. An empty result renders as an empty string.
#[must_use]
pub fn render_build_file(result: &GenerateResult) -> String {
    if result.is_empty() {
        return String::new();
    }

    let mut loads: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for target in &result.targets {
        loads
            .entry(target.kind.load_file())
            .or_default()
            .insert(target.kind.as_str());
    }

    let mut out = String::new();
    for (file, symbols) in &loads {
        out.push_str("load(");
        out.push_str(&quote(file));
        for symbol in symbols {
            out.push_str(", ");
            out.push_str(&quote(symbol));
        }
        out.push_str(")\n");
    }

    for target in &result.targets {
        out.push('\n');
        render_target(&mut out, target);
    }
    out
}

fn render_target(out: &mut String, target: &Target) {
    let _ = writeln!(out, "{}(", target.kind);
    let _ = writeln!(out, "{INDENT}name = {},", quote(&target.name));
    render_list(out, "srcs", &target.srcs);
    render_list(out, "data", &target.data);
    render_list(out, "deps", &target.deps);
    for (key, value) in &target.attrs {
        let _ = writeln!(out, "{INDENT}{key} = {},", quote(value));
    }
    out.push_str(")\n");
}

/// Single-element lists stay on one line; longer ones get one item per line.
fn render_list(out: &mut String, attr: &str, items: &[String]) {
    match items {
        [] => {}
        [only] => {
            let _ = writeln!(out, "{INDENT}{attr} = [{}],", quote(only));
        }
        _ => {
            let _ = writeln!(out, "{INDENT}{attr} = [");
            for item in items {
                let _ = writeln!(out, "{INDENT}{INDENT}{},", quote(item));
            }
            let _ = writeln!(out, "{INDENT}],");
        }
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
