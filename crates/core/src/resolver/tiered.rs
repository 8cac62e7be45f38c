//! The tiered matcher.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::config::ResolverConfig;
use super::error::ResolveError;
use super::scorer::{create_scorer, SimilarityScorer};
use super::types::{MatchTier, ResolvedMatch};
use crate::catalog::{CatalogIndex, CatalogRecord};
use crate::normalize::{restore_from_filesystem, CorrectionTables, TitleNormalizer};
use crate::scanner::FileRecord;

static TRAILING_PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r" \([^)]+\)$").unwrap());
static BRACKET_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Maps files to catalog records.
///
/// Tiers run in a fixed order and the first hit wins: skip, URL, title
/// with author, title without author, fuzzy. The index is passed per call,
/// so one resolver can serve several indexes.
pub struct Resolver {
    config: ResolverConfig,
    normalizer: TitleNormalizer,
    corrections: CorrectionTables,
    scorer: Box<dyn SimilarityScorer>,
}

impl Resolver {
    pub fn new(config: ResolverConfig, corrections: CorrectionTables) -> Self {
        let scorer = create_scorer(config.scorer);
        Self::with_scorer(config, corrections, scorer)
    }

    pub fn with_scorer(
        config: ResolverConfig,
        corrections: CorrectionTables,
        scorer: Box<dyn SimilarityScorer>,
    ) -> Self {
        Self {
            normalizer: TitleNormalizer::new(&corrections),
            config,
            corrections,
            scorer,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ResolverConfig::default(), CorrectionTables::default())
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves one loose file.
    pub fn resolve<'i>(
        &self,
        file: &FileRecord,
        index: &'i CatalogIndex,
        already_has_metadata: bool,
        force_rewrite: bool,
    ) -> Result<ResolvedMatch<'i>, ResolveError> {
        if already_has_metadata && !force_rewrite {
            debug!(file = %file.path.display(), "already has metadata, skipping lookup");
            return Ok(ResolvedMatch::skipped());
        }

        let resolved = self
            .by_url(file, index)
            .or_else(|| self.by_title(file, index))
            .or_else(|| self.by_fuzzy_title(file, index));

        match resolved {
            Some(found) => {
                debug!(
                    file = %file.path.display(),
                    tier = %found.tier,
                    url = %found.record.map(|r| r.url.as_str()).unwrap_or_default(),
                    "resolved"
                );
                Ok(found)
            }
            None => {
                debug!(file = %file.path.display(), "no tier matched");
                Err(ResolveError::NotFound {
                    path: file.path.clone(),
                })
            }
        }
    }

    /// Resolves a file inside a magazine issue folder by exact issue title.
    ///
    /// There is no fuzzy fallback here.
    pub fn resolve_issue<'i>(
        &self,
        index: &'i CatalogIndex,
        magazine_name: &str,
        file: &FileRecord,
    ) -> Result<&'i CatalogRecord, ResolveError> {
        let Some(issues) = index.by_magazine_name(magazine_name) else {
            return Err(ResolveError::UnknownMagazine {
                path: file.path.clone(),
                magazine: magazine_name.to_string(),
            });
        };

        let expected = self.issue_title(file.stem());
        issues
            .into_iter()
            .find(|record| record.title.trim().to_lowercase() == expected)
            .inspect(|record| {
                debug!(file = %file.path.display(), url = %record.url, "resolved magazine issue");
            })
            .ok_or_else(|| ResolveError::IssueNotFound {
                path: file.path.clone(),
                expected,
            })
    }

    /// Lowercased issue title as it should appear in the catalog.
    pub fn issue_title(&self, stem: &str) -> String {
        let lowered = stem.to_lowercase().replace("(1)", "").replace('＂', "\"");
        let trimmed = TRAILING_PARENTHETICAL.replace(lowered.trim_end(), "");
        let cleaned = BRACKET_GROUP.replace_all(&trimmed, "");
        let restored = restore_from_filesystem(cleaned.trim());
        self.corrections
            .correct_issue_title(&collapse_spaces(&restored))
            .to_lowercase()
    }

    fn by_url<'i>(&self, file: &FileRecord, index: &'i CatalogIndex) -> Option<ResolvedMatch<'i>> {
        let url = file.url()?;
        index
            .by_url(url)
            .map(|record| ResolvedMatch::matched(record, MatchTier::Url))
    }

    fn by_title<'i>(&self, file: &FileRecord, index: &'i CatalogIndex) -> Option<ResolvedMatch<'i>> {
        let name = file.file_name();

        let with_author = self.normalizer.corrected_key(name, true);
        if let Some(record) = index.by_title_with_author(&with_author) {
            return Some(ResolvedMatch::matched(record, MatchTier::TitleWithAuthor));
        }

        let without_author = self.normalizer.corrected_key(name, false);
        index
            .by_title_without_author(&without_author)
            .map(|record| ResolvedMatch::matched(record, MatchTier::TitleWithoutAuthor))
    }

    /// Best-scoring without-author key, accepted at or above the threshold.
    ///
    /// Keys are visited in sorted order and only a strictly higher score
    /// replaces the current best, so ties go to the smallest key.
    fn by_fuzzy_title<'i>(
        &self,
        file: &FileRecord,
        index: &'i CatalogIndex,
    ) -> Option<ResolvedMatch<'i>> {
        let query = self.normalizer.corrected_key(file.file_name(), false);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(u8, &CatalogRecord)> = None;
        for (key, record) in index.title_keys_without_author() {
            let score = self.scorer.score(&query, key);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, record));
            }
        }

        let (score, record) = best?;
        if score >= self.config.fuzzy_threshold {
            Some(ResolvedMatch::matched(record, MatchTier::Fuzzy { score }))
        } else {
            debug!(file = %file.path.display(), best = score, "fuzzy score below threshold");
            None
        }
    }
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Sidecar;
    use crate::normalize::{IssueTitleCorrection, ReplacementPair};

    fn record(url: &str, title: &str, artists: &str) -> CatalogRecord {
        CatalogRecord {
            artists: artists.into(),
            ..CatalogRecord::new(url, title)
        }
    }

    fn index(records: &[CatalogRecord]) -> CatalogIndex {
        CatalogIndex::build(records).unwrap()
    }

    fn file_with_url(name: &str, url: &str) -> FileRecord {
        let sidecar = Sidecar {
            url: Some(url.into()),
            ..Default::default()
        };
        FileRecord::new(format!("/in/{name}")).with_sidecar(sidecar)
    }

    #[test]
    fn test_skip_tier_does_not_consult_catalog() {
        let idx = index(&[record("http://x/a", "Sample", "Jane")]);
        let file = file_with_url("whatever.cbz", "http://x/a");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, true, false)
            .unwrap();
        assert!(resolved.is_skip());
        assert!(resolved.record.is_none());
    }

    #[test]
    fn test_force_rewrite_bypasses_skip() {
        let idx = index(&[record("http://x/a", "Sample", "Jane")]);
        let file = file_with_url("whatever.cbz", "http://x/a");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, true, true)
            .unwrap();
        assert_eq!(resolved.tier, MatchTier::Url);
    }

    #[test]
    fn test_url_tier_ignores_filename() {
        let idx = index(&[
            record("http://x/a", "Sample", "Jane"),
            record("http://x/b", "Other", "Bob"),
        ]);
        let file = file_with_url("[Bob] Other.cbz", "HTTP://X/A");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, false, false)
            .unwrap();
        assert_eq!(resolved.tier, MatchTier::Url);
        assert_eq!(resolved.record.unwrap().url, "http://x/a");
    }

    #[test]
    fn test_unknown_url_falls_through_to_title() {
        let idx = index(&[record("http://x/a", "Sample", "Jane")]);
        let file = file_with_url("[Jane] Sample.cbz", "http://x/missing");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, false, false)
            .unwrap();
        assert_eq!(resolved.tier, MatchTier::TitleWithAuthor);
    }

    #[test]
    fn test_title_with_author_tier() {
        let idx = index(&[record("u1", "Summer Story", "Jane Doe")]);
        let file = FileRecord::new("/in/(C99) [Jane Doe] Summer Story [Digital] (x3200).cbz");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, false, false)
            .unwrap();
        assert_eq!(resolved.tier, MatchTier::TitleWithAuthor);
    }

    #[test]
    fn test_title_without_author_tier() {
        let idx = index(&[record("u1", "Summer Story", "Jane Doe")]);
        let file = FileRecord::new("/in/[J. Doe] Summer Story.cbz");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, false, false)
            .unwrap();
        assert_eq!(resolved.tier, MatchTier::TitleWithoutAuthor);
    }

    #[test]
    fn test_title_correction_applied() {
        let corrections = CorrectionTables {
            title: vec![ReplacementPair::new("summer storie", "summer story")],
            ..Default::default()
        };
        let idx = index(&[record("u1", "Summer Story", "Jane")]);
        let resolver = Resolver::new(ResolverConfig::default(), corrections);
        let file = FileRecord::new("/in/[Jane] Summer Storie.cbz");
        let resolved = resolver.resolve(&file, &idx, false, false).unwrap();
        assert_eq!(resolved.tier, MatchTier::TitleWithAuthor);
    }

    #[test]
    fn test_fuzzy_tier() {
        let idx = index(&[record("u1", "The Long Summer Story", "Jane")]);
        let file = FileRecord::new("/in/[Someone] The Long Summer Storys.cbz");
        let resolved = Resolver::with_defaults()
            .resolve(&file, &idx, false, false)
            .unwrap();
        assert!(matches!(resolved.tier, MatchTier::Fuzzy { score } if score >= 85));
    }

    #[test]
    fn test_fuzzy_boundary_is_inclusive() {
        let base = "a".repeat(100);
        let idx = index(&[record("u1", &base, "")]);
        let resolver = Resolver::with_defaults();

        let at_85 = FileRecord::new(format!("/in/{}{}.cbz", "a".repeat(85), "b".repeat(15)));
        let resolved = resolver.resolve(&at_85, &idx, false, false).unwrap();
        assert_eq!(resolved.tier, MatchTier::Fuzzy { score: 85 });

        let at_84 = FileRecord::new(format!("/in/{}{}.cbz", "a".repeat(84), "b".repeat(16)));
        let err = resolver.resolve(&at_84, &idx, false, false).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn test_fuzzy_tie_goes_to_first_key() {
        let idx = index(&[record("u-b", "abcx", ""), record("u-a", "abcy", "")]);
        let file = FileRecord::new("/in/abcz.cbz");
        let resolver = Resolver::new(
            ResolverConfig::default().with_fuzzy_threshold(50),
            CorrectionTables::default(),
        );
        let resolved = resolver.resolve(&file, &idx, false, false).unwrap();
        assert_eq!(resolved.record.unwrap().url, "u-b");
    }

    #[test]
    fn test_not_found() {
        let idx = index(&[record("u1", "Sample", "Jane")]);
        let file = FileRecord::new("/in/Completely Different.cbz");
        let err = Resolver::with_defaults()
            .resolve(&file, &idx, false, false)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                path: "/in/Completely Different.cbz".into()
            }
        );
    }

    fn magazine_record(url: &str, title: &str, magazine: &str) -> CatalogRecord {
        CatalogRecord {
            magazine: magazine.into(),
            ..CatalogRecord::new(url, title)
        }
    }

    #[test]
    fn test_issue_title_cleanup() {
        let resolver = Resolver::with_defaults();
        assert_eq!(
            resolver.issue_title("[Jane] Story Time！ (COMIC X 2021-03)(1)"),
            "story time!"
        );
        assert_eq!(resolver.issue_title("＂Quoted＂ Story"), "\"quoted\" story");
    }

    #[test]
    fn test_resolve_issue_exact_case_insensitive() {
        let idx = index(&[
            magazine_record("m1", "Comic X - Issue 1", "Comic X Vol.1"),
            magazine_record("m2", "Comic X - Issue 2", "Comic X Vol.2"),
        ]);
        let file = FileRecord::new("/in/Comic X/Comic X - Issue 1.cbz");
        let record = Resolver::with_defaults()
            .resolve_issue(&idx, "comic x", &file)
            .unwrap();
        assert_eq!(record.url, "m1");
    }

    #[test]
    fn test_resolve_issue_has_no_fuzzy_fallback() {
        let idx = index(&[magazine_record("m1", "Comic X - Issue 1", "Comic X Vol.1")]);
        let file = FileRecord::new("/in/Comic X/Comic X - Issue l.cbz");
        let err = Resolver::with_defaults()
            .resolve_issue(&idx, "Comic X", &file)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::IssueNotFound {
                path: "/in/Comic X/Comic X - Issue l.cbz".into(),
                expected: "comic x - issue l".into(),
            }
        );
    }

    #[test]
    fn test_resolve_issue_unknown_magazine() {
        let idx = index(&[magazine_record("m1", "Story", "Comic X Vol.1")]);
        let file = FileRecord::new("/in/Comic Y/Story.cbz");
        let err = Resolver::with_defaults()
            .resolve_issue(&idx, "Comic Y", &file)
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownMagazine { .. }));
    }

    #[test]
    fn test_issue_title_correction() {
        let corrections = CorrectionTables {
            issue_title: vec![IssueTitleCorrection {
                prefix: "story ti".into(),
                title: "Story Time".into(),
            }],
            ..Default::default()
        };
        let idx = index(&[magazine_record("m1", "Story Time", "Comic X Vol.1")]);
        let resolver = Resolver::new(ResolverConfig::default(), corrections);
        let file = FileRecord::new("/in/Comic X/Story Tiem.cbz");
        assert_eq!(resolver.resolve_issue(&idx, "Comic X", &file).unwrap().url, "m1");
    }
}
