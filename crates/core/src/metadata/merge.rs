//! Series aggregation of several catalog records.

use crate::catalog::CatalogRecord;
use crate::normalize::split_list;

const UNCENSORED: &str = "UNCENSORED";

/// Merges `records` into one synthetic record titled `series_title`.
///
/// List-shaped fields become the de-duplicated union of all members, in
/// first-seen order. Censorship is `UNCENSORED` when any member is, else the
/// first member's value. Descriptions are joined with a blank line in member
/// order, so unlike the unions they depend on input order.
pub fn merge(series_title: &str, records: &[CatalogRecord]) -> CatalogRecord {
    let union = |field: fn(&CatalogRecord) -> &str| -> String {
        let mut seen: Vec<String> = Vec::new();
        for record in records {
            for part in split_list(field(record)) {
                if !seen.contains(&part) {
                    seen.push(part);
                }
            }
        }
        seen.join(", ")
    };

    let censorship = if records
        .iter()
        .any(|r| r.censorship.trim().eq_ignore_ascii_case(UNCENSORED))
    {
        UNCENSORED.to_string()
    } else {
        first_non_empty(records, |r| &r.censorship)
    };

    let description = records
        .iter()
        .map(|r| r.description.trim())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    CatalogRecord {
        category: records.first().and_then(|r| r.category),
        url: String::new(),
        title: series_title.to_string(),
        author: union(|r| &r.author),
        artists: union(|r| &r.artists),
        parodies: union(|r| &r.parodies),
        circles: union(|r| &r.circles),
        publisher: union(|r| &r.publisher),
        event: union(|r| &r.event),
        magazine: union(|r| &r.magazine),
        language: union(|r| &r.language),
        translator: union(|r| &r.translator),
        tags: union(|r| &r.tags),
        color: first_non_empty(records, |r| &r.color),
        censorship,
        description,
    }
}

fn first_non_empty(records: &[CatalogRecord], field: fn(&CatalogRecord) -> &str) -> String {
    records
        .iter()
        .map(|r| field(r).trim())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn member(tags: &str, censorship: &str, description: &str) -> CatalogRecord {
        CatalogRecord {
            artists: "Jane".into(),
            tags: tags.into(),
            censorship: censorship.into(),
            description: description.into(),
            ..CatalogRecord::new("u", "t")
        }
    }

    fn as_set(field: &str) -> BTreeSet<String> {
        split_list(field).into_iter().collect()
    }

    #[test]
    fn test_lists_are_deduplicated_unions() {
        let merged = merge(
            "Comic X",
            &[member("a, b", "", ""), member("b, c", "", "")],
        );
        assert_eq!(merged.title, "Comic X");
        assert_eq!(merged.tags, "a, b, c");
        assert_eq!(merged.artists, "Jane");
        assert!(merged.url.is_empty());
    }

    #[test]
    fn test_union_does_not_depend_on_order() {
        let a = member("x, y", "", "first");
        let b = member("y, z", "", "second");
        let forward = merge("S", &[a.clone(), b.clone()]);
        let backward = merge("S", &[b, a]);

        assert_eq!(as_set(&forward.tags), as_set(&backward.tags));
        assert_eq!(as_set(&forward.artists), as_set(&backward.artists));
        // Descriptions keep member order.
        assert_eq!(forward.description, "first\n\nsecond");
        assert_eq!(backward.description, "second\n\nfirst");
    }

    #[test]
    fn test_any_uncensored_member_wins() {
        let merged = merge(
            "S",
            &[member("", "CENSORED", ""), member("", "uncensored", "")],
        );
        assert_eq!(merged.censorship, "UNCENSORED");

        let merged = merge("S", &[member("", "", ""), member("", "CENSORED", "")]);
        assert_eq!(merged.censorship, "CENSORED");
    }

    #[test]
    fn test_empty_descriptions_are_skipped() {
        let merged = merge(
            "S",
            &[member("", "", ""), member("", "", "only"), member("", "", " ")],
        );
        assert_eq!(merged.description, "only");
    }

    #[test]
    fn test_merge_of_nothing() {
        let merged = merge("S", &[]);
        assert_eq!(merged.title, "S");
        assert!(merged.tags.is_empty());
        assert!(merged.category.is_none());
    }
}
