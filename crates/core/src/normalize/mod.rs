//! Canonical key and name normalization.
//!
//! Everything in here is a pure string transformation: titles and filenames
//! become lookup keys, magazine fields become `(name, issue)` pairs, and free
//! text becomes safe to use as a path segment. Dataset-specific patches live
//! in [`CorrectionTables`], which is loaded from disk rather than compiled in.

mod corrections;
mod magazine;
mod publisher;
mod sanitize;
mod title;

pub use corrections::{
    CorrectionTables, IssueTitleCorrection, ReplacementPair, TitlePublisher,
};
pub use magazine::{
    compose_magazine_issue_key, normalize_magazine_key, published_year, MagazineKey,
};
pub use publisher::PublisherDetector;
pub use sanitize::{restore_from_filesystem, sanitize_for_filesystem};
pub use title::{normalize_title_key, TitleNormalizer};

/// Splits a comma-joined field into trimmed, non-empty parts.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_empties() {
        assert_eq!(split_list(" a, b ,,c ,"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }
}
