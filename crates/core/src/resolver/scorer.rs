//! String similarity on a 0-100 scale.

use super::config::ScorerKind;

/// Scores how similar two title keys are.
pub trait SimilarityScorer: Send + Sync {
    fn name(&self) -> &str;

    /// Similarity in `0..=100`; identical strings score 100.
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Builds the scorer selected in configuration.
pub fn create_scorer(kind: ScorerKind) -> Box<dyn SimilarityScorer> {
    match kind {
        ScorerKind::Indel => Box::new(IndelRatio),
        ScorerKind::Levenshtein => Box::new(NormalizedLevenshtein),
    }
}

/// `round(100 * 2 * lcs / (len(a) + len(b)))` over characters.
///
/// Only insertions and deletions count as edits, so a substitution costs
/// two. strsim offers no indel ratio, so the LCS is computed here over
/// `char`s rather than bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl SimilarityScorer for IndelRatio {
    fn name(&self) -> &str {
        "indel"
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 100;
        }
        let lcs = longest_common_subsequence(&a, &b);
        // Integer round-half-up of 200 * lcs / total.
        ((400 * lcs + total) / (2 * total)) as u8
    }
}

/// `strsim::normalized_levenshtein`, scaled to 0-100.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl SimilarityScorer for NormalizedLevenshtein {
    fn name(&self) -> &str {
        "levenshtein"
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
    }
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
