//! Manually maintained correction tables.
//!
//! These are data, not logic: every entry patches one known
//! mis-normalization in a real library. Nothing here is ever inferred.

use serde::{Deserialize, Serialize};

/// An exact substring replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementPair {
    pub from: String,
    pub to: String,
}

impl ReplacementPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Replaces an issue title starting with `prefix` by `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTitleCorrection {
    pub prefix: String,
    pub title: String,
}

/// Assigns `publisher` to files whose name contains `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePublisher {
    pub title: String,
    pub publisher: String,
}

/// All correction tables, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionTables {
    /// Applied to normalized title keys (lowercase, single-spaced).
    #[serde(default)]
    pub title: Vec<ReplacementPair>,

    /// Applied to issue titles extracted from filenames in magazine folders.
    #[serde(default)]
    pub issue_title: Vec<IssueTitleCorrection>,

    /// Extra noise stripped during title normalization.
    #[serde(default)]
    pub noise_tokens: Vec<String>,

    /// Applied to publishers parsed out of filenames.
    #[serde(default)]
    pub publisher_aliases: Vec<ReplacementPair>,

    /// Publisher fallback for filenames that carry no publisher tag.
    #[serde(default)]
    pub publishers_by_title: Vec<TitlePublisher>,

    /// Magazine values that are really publishers or quality tags.
    #[serde(default)]
    pub ignored_magazines: Vec<String>,

    /// Leading words of trailing parentheticals that belong to the title.
    #[serde(default = "default_preserved_parentheticals")]
    pub preserved_parentheticals: Vec<String>,
}

pub(crate) fn default_preserved_parentheticals() -> Vec<String> {
    ["part", "vol", "volume", "chapter", "ch"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CorrectionTables {
    fn default() -> Self {
        Self {
            title: Vec::new(),
            issue_title: Vec::new(),
            noise_tokens: Vec::new(),
            publisher_aliases: Vec::new(),
            publishers_by_title: Vec::new(),
            ignored_magazines: Vec::new(),
            preserved_parentheticals: default_preserved_parentheticals(),
        }
    }
}

impl CorrectionTables {
    /// Parses tables from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies the issue-title table; the first matching prefix wins.
    pub fn correct_issue_title(&self, issue_title: &str) -> String {
        self.issue_title
            .iter()
            .find(|c| issue_title.starts_with(&c.prefix))
            .map(|c| {
                tracing::debug!(from = %issue_title, to = %c.title, "applied issue title correction");
                c.title.clone()
            })
            .unwrap_or_else(|| issue_title.to_string())
    }

    /// Whether a magazine value is listed as not being a magazine.
    pub fn is_ignored_magazine(&self, magazine: &str) -> bool {
        self.ignored_magazines
            .iter()
            .any(|m| m.eq_ignore_ascii_case(magazine.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tables() {
        let text = r#"
ignored_magazines = ["x3200", "C90"]

[[title]]
from = "cherrygals"
to = "cherry gals"

[[issue_title]]
prefix = "the nights to come"
title = "the night to come"

[[publishers_by_title]]
title = "Morning Milk"
publisher = "2D Market"
"#;
        let tables = CorrectionTables::from_toml_str(text).unwrap();
        assert_eq!(tables.title, vec![ReplacementPair::new("cherrygals", "cherry gals")]);
        assert_eq!(tables.issue_title.len(), 1);
        assert_eq!(tables.publishers_by_title[0].publisher, "2D Market");
        assert_eq!(tables.preserved_parentheticals, default_preserved_parentheticals());
    }

    #[test]
    fn test_correct_issue_title_prefix() {
        let tables = CorrectionTables {
            issue_title: vec![IssueTitleCorrection {
                prefix: "the nights to come".into(),
                title: "the night to come".into(),
            }],
            ..CorrectionTables::default()
        };
        assert_eq!(
            tables.correct_issue_title("the nights to come part 2"),
            "the night to come"
        );
        assert_eq!(tables.correct_issue_title("other"), "other");
    }

    #[test]
    fn test_ignored_magazine_is_case_insensitive() {
        let tables = CorrectionTables {
            ignored_magazines: vec!["C90".into()],
            ..CorrectionTables::default()
        };
        assert!(tables.is_ignored_magazine("c90"));
        assert!(!tables.is_ignored_magazine("Comic X 2020-01"));
    }
}
