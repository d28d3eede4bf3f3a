//! Rule-kind inference.
//!
//! A directory's library/binary kind is a fold of per-file [`Evidence`]
//! over its source files. The decision table lives in [`Evidence::decide`].

use crate::classify::{SourceFileRecord, APP_SENTINELS};
use crate::error::Error;
use crate::kind::{LanguageTier, RuleKind};

/// Accumulated evidence about a directory's sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evidence {
    /// Highest language tier seen; `None` until a source file is observed.
    pub tier: Option<LanguageTier>,
    /// Some source file is an entry point.
    pub entry: bool,
    /// Some source file marks an application root.
    pub app: bool,
}

impl Evidence {
    /// Fold one record in. Tests and assets contribute nothing.
    #[must_use]
    pub fn observe(self, record: &SourceFileRecord) -> Self {
        let Some(tier) = record.pattern.tier() else {
            return self;
        };
        self.merge(Self {
            tier: Some(tier),
            entry: record.is_entry,
            app: APP_SENTINELS.contains(&record.name.as_str()),
        })
    }

    /// Lattice join of two partial folds.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            tier: self.tier.max(other.tier),
            entry: self.entry || other.entry,
            app: self.app || other.app,
        }
    }

    /// Rule kind for the evidence, or `None` if no source was observed.
    #[must_use]
    pub fn decide(self) -> Option<RuleKind> {
        let tier = self.tier?;
        let kind = match (self.app, tier, self.entry) {
            (true, _, _) => RuleKind::ViteApp,
            (false, LanguageTier::Primary, true) => RuleKind::TsBinary,
            (false, LanguageTier::Primary, false) => RuleKind::TsLibrary,
            (false, LanguageTier::Secondary, true) => RuleKind::JsBinary,
            (false, LanguageTier::Secondary, false) => RuleKind::JsLibrary,
        };
        Some(kind)
    }
}

/// Infer the library/binary kind for `package` from its records.
///
/// Callers must only ask when the directory has source files; asking
/// without any is a contract violation and reported as such.
pub fn infer_rule_kind<'a, I>(package: &str, records: I) -> Result<RuleKind, Error>
where
    I: IntoIterator<Item = &'a SourceFileRecord>,
{
    records
        .into_iter()
        .fold(Evidence::default(), Evidence::observe)
        .decide()
        .ok_or_else(|| Error::NoSourceEvidence {
            package: package.to_string(),
        })
}
