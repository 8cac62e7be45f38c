//! Types for the resolver module.

use std::fmt;

use crate::catalog::CatalogRecord;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Already has metadata and rewriting is off; the catalog was not consulted.
    Skip,
    Url,
    TitleWithAuthor,
    TitleWithoutAuthor,
    Fuzzy { score: u8 },
    /// Exact issue title inside one magazine.
    MagazineIssue,
}

impl MatchTier {
    /// Short label, also used as a metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Url => "url",
            Self::TitleWithAuthor => "title_with_author",
            Self::TitleWithoutAuthor => "title_without_author",
            Self::Fuzzy { .. } => "fuzzy",
            Self::MagazineIssue => "magazine_issue",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fuzzy { score } => write!(f, "fuzzy ({score})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Outcome of resolving one file.
///
/// `record` is `None` only for [`MatchTier::Skip`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMatch<'i> {
    pub record: Option<&'i CatalogRecord>,
    pub tier: MatchTier,
}

impl<'i> ResolvedMatch<'i> {
    pub fn skipped() -> Self {
        Self {
            record: None,
            tier: MatchTier::Skip,
        }
    }

    pub fn matched(record: &'i CatalogRecord, tier: MatchTier) -> Self {
        Self {
            record: Some(record),
            tier,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.tier == MatchTier::Skip
    }
}
