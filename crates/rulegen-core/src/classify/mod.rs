//! File role classification.
//!
//! Every file name maps to at most one [`RolePattern`]: the first variant in
//! [`PRECEDENCE`] whose predicate accepts it. The order is load-bearing;
//! an end-to-end test such as `login.pw.spec.ts` also looks like a unit
//! test and like a TypeScript source.

mod record;

pub use record::{classify_files, SourceFileRecord};

use crate::kind::{LanguageTier, RuleKind};

const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];
const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];
const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx"];
const ASSET_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less", "svg"];
const TEST_MARKERS: &[&str] = &["spec", "test"];
const E2E_MARKER: &str = "pw";

/// Stem of an entry-point file; the name must be exactly `main.<ext>`.
const ENTRY_STEM: &str = "main";

/// File names that mark the root of a bundled web application.
pub const APP_SENTINELS: &[&str] = &[
    "vite.config.ts",
    "vite.config.mts",
    "vite.config.js",
    "vite.config.mjs",
];

/// Role of a file within its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RolePattern {
    /// Browser-driven test: `*.pw.spec.{ts,tsx,js,jsx,...}`.
    E2eTest,
    /// Unit test of a component: `Button.test.tsx`. Needs a DOM.
    ComponentTest,
    /// Unit test: `*.spec.*`, `*.test.*`.
    UnitTest,
    TsSource,
    JsSource,
    /// Stylesheets and images; shipped as `data`, never scanned.
    Asset,
}

/// Evaluation order of [`RolePattern`] predicates.
pub const PRECEDENCE: [RolePattern; 6] = [
    RolePattern::E2eTest,
    RolePattern::ComponentTest,
    RolePattern::UnitTest,
    RolePattern::TsSource,
    RolePattern::JsSource,
    RolePattern::Asset,
];

/// Classify a base file name. Hidden files are never classified.
#[must_use]
pub fn classify(file_name: &str) -> Option<RolePattern> {
    if file_name.starts_with('.') {
        return None;
    }
    PRECEDENCE.into_iter().find(|p| p.matches(file_name))
}

impl RolePattern {
    /// Whether this pattern's predicate accepts `file_name`, ignoring precedence.
    #[must_use]
    pub fn matches(self, file_name: &str) -> bool {
        let name = NameParts::split(file_name);
        match self {
            Self::E2eTest => name.is_e2e_test(),
            Self::ComponentTest => {
                name.is_unit_test()
                    && COMPONENT_EXTENSIONS.contains(&name.ext)
                    && looks_like_component(name.stem)
            }
            Self::UnitTest => name.is_unit_test(),
            Self::TsSource => !name.is_test() && TS_EXTENSIONS.contains(&name.ext),
            Self::JsSource => !name.is_test() && JS_EXTENSIONS.contains(&name.ext),
            Self::Asset => ASSET_EXTENSIONS.contains(&name.ext),
        }
    }

    /// Whether `file_name` is an entry point for this pattern.
    #[must_use]
    pub fn is_entry(self, file_name: &str) -> bool {
        let name = NameParts::split(file_name);
        self.tier().is_some() && name.stem == ENTRY_STEM && name.middle.is_empty()
    }

    #[must_use]
    pub fn is_test(self) -> bool {
        self.test_kind().is_some()
    }

    #[must_use]
    pub fn is_asset(self) -> bool {
        self == Self::Asset
    }

    /// Language evidence this pattern contributes to rule-kind inference.
    #[must_use]
    pub fn tier(self) -> Option<LanguageTier> {
        match self {
            Self::TsSource => Some(LanguageTier::Primary),
            Self::JsSource => Some(LanguageTier::Secondary),
            _ => None,
        }
    }

    /// Rule kind of the combined test target for this family.
    #[must_use]
    pub fn test_kind(self) -> Option<RuleKind> {
        match self {
            Self::E2eTest => Some(RuleKind::PlaywrightTest),
            Self::ComponentTest | Self::UnitTest => Some(RuleKind::VitestTest),
            _ => None,
        }
    }

    /// Suffix appended to the package name to name this family's test target.
    #[must_use]
    pub fn target_suffix(self) -> &'static str {
        match self {
            Self::E2eTest => "_e2e_test",
            Self::ComponentTest => "_component_test",
            Self::UnitTest => "_test",
            _ => "",
        }
    }

    /// Extra attributes for targets built from this pattern.
    #[must_use]
    pub fn extra_attrs(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::ComponentTest => &[("environment", "jsdom")],
            _ => &[],
        }
    }
}

/// A file name split as `stem.[marker.]*ext`.
struct NameParts<'a> {
    stem: &'a str,
    /// Dot-separated segments between stem and extension, innermost last.
    middle: Vec<&'a str>,
    ext: &'a str,
}

impl<'a> NameParts<'a> {
    fn split(file_name: &'a str) -> Self {
        let mut segments: Vec<&str> = file_name.split('.').collect();
        if segments.len() < 2 {
            return Self {
                stem: file_name,
                middle: Vec::new(),
                ext: "",
            };
        }
        let ext = segments.pop().unwrap_or_default();
        let stem = segments.remove(0);
        Self {
            stem,
            middle: segments,
            ext,
        }
    }

    fn is_script(&self) -> bool {
        TS_EXTENSIONS.contains(&self.ext) || JS_EXTENSIONS.contains(&self.ext)
    }

    fn is_test(&self) -> bool {
        self.is_script()
            && self
                .middle
                .last()
                .is_some_and(|m| TEST_MARKERS.contains(m))
    }

    fn is_e2e_test(&self) -> bool {
        let n = self.middle.len();
        self.is_script()
            && n >= 2
            && self.middle[n - 1] == "spec"
            && self.middle[n - 2] == E2E_MARKER
    }

    fn is_unit_test(&self) -> bool {
        self.is_test() && !self.is_e2e_test()
    }
}

/// Component file names are PascalCase identifiers: `Button`, `App`.
fn looks_like_component(stem: &str) -> bool {
    stem.chars().next().is_some_and(char::is_uppercase)
        && stem.chars().all(|c| c.is_alphanumeric() || c == '_')
}
