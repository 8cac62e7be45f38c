//! Title keys for catalog lookups.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::corrections::{CorrectionTables, ReplacementPair};

static LEADING_EVENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\([^()]*\)\s*").unwrap());
static LEADING_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[[^\]]*\]").unwrap());
static CIRCLE_WITH_AUTHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]()]*\(([^()\[\]]*)\)\]").unwrap());

/// Archive extensions stripped from raw filenames.
const EXTENSIONS: &[&str] = &[".cbz", ".zip"];

/// Format, storefront and scan-quality tags that never belong to a title.
const DEFAULT_NOISE: &[&str] = &[
    "[digital]",
    "[decensored]",
    "[english]",
    "[2d market]",
    "[2d-market]",
    "[2d-market.com]",
    "{2d-market.com}",
    "[irodori comics]",
    "[fakku irodori comics]",
    "[fakku & irodori comics]",
    "[not fakku]",
    "[fakku]",
    "[png]",
    "[]",
    "(x1518)",
    "(x1920)",
    "(1920x)",
    "(x2000)",
    "(2560x)",
    "(x2600)",
    "(x2880)",
    "(x3038)",
    "(x3100)",
    "(x3100+)",
    "(x3199)",
    "(x3200)",
    "(x3200-improper)",
    "(png)",
    "(fakku)",
    "(full color version)",
    "x3200 fakku",
    "x3200",
];

/// Builds title keys: lowercase, tag-free, single-spaced alphanumerics.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    /// Noise containing punctuation, removed as raw substrings.
    tagged_noise: Vec<String>,
    /// Noise made only of words, removed as whole word runs.
    word_noise: Vec<Vec<String>>,
    preserved: Vec<String>,
    corrections: Vec<ReplacementPair>,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new(&CorrectionTables::default())
    }
}

impl TitleNormalizer {
    pub fn new(tables: &CorrectionTables) -> Self {
        let mut tagged_noise = Vec::new();
        let mut word_noise = Vec::new();

        let all = DEFAULT_NOISE
            .iter()
            .map(|s| s.to_string())
            .chain(tables.noise_tokens.iter().map(|s| s.to_lowercase()));
        for token in all {
            if token.chars().all(|c| c.is_alphanumeric() || c == ' ') {
                let words: Vec<String> = token.split_whitespace().map(String::from).collect();
                if !words.is_empty() {
                    word_noise.push(words);
                }
            } else {
                tagged_noise.push(token);
            }
        }
        // Longest first so "x3200 fakku" wins over "x3200".
        word_noise.sort_by(|a, b| b.len().cmp(&a.len()));

        Self {
            tagged_noise,
            word_noise,
            preserved: tables
                .preserved_parentheticals
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            corrections: tables.title.clone(),
        }
    }

    /// Normalizes a raw filename or title into a lookup key.
    ///
    /// With `with_author == false` the leading `[...]` credit is dropped
    /// first, so the key is the bare title.
    pub fn normalize(&self, raw: &str, with_author: bool) -> String {
        let mut s = raw.trim().to_lowercase();

        for ext in EXTENSIONS {
            if let Some(stripped) = s.strip_suffix(ext) {
                s = stripped.to_string();
                break;
            }
        }

        s = LEADING_EVENT.replace(&s, "").into_owned();
        if !with_author {
            s = LEADING_GROUP.replace(&s, "").into_owned();
        }
        s = CIRCLE_WITH_AUTHOR.replace_all(&s, "[$1]").into_owned();

        for token in &self.tagged_noise {
            if s.contains(token.as_str()) {
                s = s.replace(token.as_str(), " ");
            }
        }

        s = self.strip_trailing_groups(s.trim());

        let words: Vec<&str> = s
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.drop_noise_words(words).join(" ")
    }

    /// Applies the manual title corrections to a normalized key.
    pub fn correct(&self, key: &str) -> String {
        let mut out = key.to_string();
        for pair in &self.corrections {
            if out.contains(pair.from.as_str()) {
                debug!(from = %pair.from, to = %pair.to, "applied title correction");
                out = out.replace(pair.from.as_str(), &pair.to);
            }
        }
        out
    }

    /// `normalize` followed by `correct`.
    pub fn corrected_key(&self, raw: &str, with_author: bool) -> String {
        self.correct(&self.normalize(raw, with_author))
    }

    /// Repeatedly removes trailing `[...]` and `(...)` groups.
    ///
    /// A trailing parenthetical whose first word is a preserved marker (such
    /// as `part` or `vol`) is title content and ends the stripping. A group
    /// that spans the whole string is never removed.
    fn strip_trailing_groups(&self, input: &str) -> String {
        let mut s = input.trim_end().to_string();
        loop {
            let (open, close) = match s.chars().last() {
                Some(']') => ('[', ']'),
                Some(')') => ('(', ')'),
                _ => break,
            };
            let Some(start) = matching_open(&s, open, close) else {
                break;
            };
            if start == 0 {
                break;
            }
            if open == '(' && self.is_preserved(&s[start + 1..s.len() - 1]) {
                break;
            }
            s.truncate(start);
            s = s.trim_end().to_string();
        }
        s
    }

    fn is_preserved(&self, content: &str) -> bool {
        let first: String = content
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect();
        !first.is_empty() && self.preserved.iter().any(|p| *p == first)
    }

    fn drop_noise_words<'a>(&self, mut words: Vec<&'a str>) -> Vec<&'a str> {
        loop {
            let mut changed = false;
            for noise in &self.word_noise {
                let n = noise.len();
                let mut i = 0;
                while i + n <= words.len() {
                    if words[i..i + n].iter().zip(noise).all(|(w, t)| *w == t.as_str()) {
                        words.drain(i..i + n);
                        changed = true;
                    } else {
                        i += 1;
                    }
                }
            }
            if !changed {
                return words;
            }
        }
    }
}

/// Byte offset of the bracket opening the group that closes at the end of `s`.
fn matching_open(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices().rev() {
        if c == close {
            depth += 1;
        } else if c == open {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

static DEFAULT_NORMALIZER: Lazy<TitleNormalizer> = Lazy::new(TitleNormalizer::default);

/// Normalizes with the built-in noise list and no corrections.
pub fn normalize_title_key(raw: &str, with_author: bool) -> String {
    DEFAULT_NORMALIZER.normalize(raw, with_author)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_with_author() {
        assert_eq!(
            normalize_title_key("[Jane] Sample (x3200) [Digital].cbz", true),
            "jane sample"
        );
    }

    #[test]
    fn test_normalize_without_author_drops_credit() {
        assert_eq!(
            normalize_title_key("[Jane] Sample (x3200) [Digital].cbz", false),
            "sample"
        );
    }

    #[test]
    fn test_normalize_event_and_circle() {
        assert_eq!(
            normalize_title_key("(C99) [Some Circle (Jane Doe)] Summer Story [English].zip", true),
            "jane doe summer story"
        );
        assert_eq!(
            normalize_title_key("(C99) [Some Circle (Jane Doe)] Summer Story [English].zip", false),
            "summer story"
        );
    }

    #[test]
    fn test_normalize_strips_stacked_trailing_groups() {
        assert_eq!(
            normalize_title_key("[A] Title [Publisher] [Group] (1)", true),
            "a title"
        );
    }

    #[test]
    fn test_normalize_keeps_preserved_parenthetical() {
        assert_eq!(
            normalize_title_key("[A] Long Story (Part 2) [FAKKU]", true),
            "a long story part 2"
        );
        assert_eq!(
            normalize_title_key("[A] Long Story (Vol.3)", false),
            "long story vol 3"
        );
    }

    #[test]
    fn test_normalize_unicode_punctuation() {
        assert_eq!(
            normalize_title_key("[Jane] Re：Zero？ — Début!", true),
            "jane re zero début"
        );
    }

    #[test]
    fn test_normalize_bare_quality_word() {
        assert_eq!(normalize_title_key("title x3200 fakku", true), "title");
        assert_eq!(normalize_title_key("x3200 x3200 fakku", true), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "[Jane] Sample (x3200) [Digital].cbz",
            "(C99) [Some Circle (Jane Doe)] Summer Story [English].zip",
            "[A] Long Story (Part 2) [FAKKU]",
            "unrelated_name.cbz",
            "[Only Bracket]",
            "x3x3200200",
            "  ((weird)) [nested [brackets]] end ",
        ];
        for input in inputs {
            for with_author in [true, false] {
                let once = normalize_title_key(input, with_author);
                let twice = normalize_title_key(&once, with_author);
                assert_eq!(once, twice, "input: {input:?}, with_author: {with_author}");
            }
        }
    }

    #[test]
    fn test_whole_string_group_is_kept() {
        assert_eq!(normalize_title_key("[Only Bracket]", true), "only bracket");
    }

    #[test]
    fn test_configured_noise_and_corrections() {
        let tables = CorrectionTables {
            noise_tokens: vec!["[Scanlated]".into(), "Remastered".into()],
            title: vec![ReplacementPair::new("cherrygals", "cherry gals")],
            ..Default::default()
        };
        let normalizer = TitleNormalizer::new(&tables);
        assert_eq!(
            normalizer.normalize("[M] Cherrygals [Scanlated] Remastered", true),
            "m cherrygals"
        );
        assert_eq!(
            normalizer.corrected_key("[M] Cherrygals [Scanlated] Remastered", true),
            "m cherry gals"
        );
    }
}
