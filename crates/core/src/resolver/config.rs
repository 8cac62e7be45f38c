//! Configuration for the resolver.

use serde::{Deserialize, Serialize};

/// Similarity function used by the fuzzy tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Indel (insert/delete) ratio, `2 * lcs / total`.
    #[default]
    Indel,
    /// Normalized Levenshtein distance.
    Levenshtein,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Minimum fuzzy score (0-100, inclusive) for a match.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,

    #[serde(default)]
    pub scorer: ScorerKind,
}

fn default_fuzzy_threshold() -> u8 {
    85
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            scorer: ScorerKind::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_fuzzy_threshold(mut self, threshold: u8) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }
}
