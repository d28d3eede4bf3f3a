//! Generated rule kinds.

use serde::{Deserialize, Serialize};

/// Language tier of a source file. Ordered: `Primary` outranks `Secondary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageTier {
    /// JavaScript.
    Secondary,
    /// TypeScript.
    Primary,
}

/// Kind of a generated target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    TsLibrary,
    TsBinary,
    /// Web application rooted at a bundler config.
    ViteApp,
    JsLibrary,
    JsBinary,
    VitestTest,
    PlaywrightTest,
}

impl RuleKind {
    pub const ALL: [RuleKind; 7] = [
        Self::TsLibrary,
        Self::TsBinary,
        Self::ViteApp,
        Self::JsLibrary,
        Self::JsBinary,
        Self::VitestTest,
        Self::PlaywrightTest,
    ];

    /// Rule name as written in a BUILD file.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TsLibrary => "ts_library",
            Self::TsBinary => "ts_binary",
            Self::ViteApp => "vite_app",
            Self::JsLibrary => "js_library",
            Self::JsBinary => "js_binary",
            Self::VitestTest => "vitest_test",
            Self::PlaywrightTest => "playwright_test",
        }
    }

    /// Label of the `.bzl` file that defines the rule.
    #[must_use]
    pub fn load_file(&self) -> &'static str {
        match self {
            Self::TsLibrary | Self::TsBinary => "//bazel/ts:defs.bzl",
            Self::ViteApp => "//bazel/vite:defs.bzl",
            Self::JsLibrary | Self::JsBinary => "//bazel/js:defs.bzl",
            Self::VitestTest => "//bazel/vitest:defs.bzl",
            Self::PlaywrightTest => "//bazel/playwright:defs.bzl",
        }
    }

    #[must_use]
    pub fn is_test(&self) -> bool {
        matches!(self, Self::VitestTest | Self::PlaywrightTest)
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
