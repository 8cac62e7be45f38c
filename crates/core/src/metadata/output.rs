//! The normalized metadata document written into archives.

use serde::{Deserialize, Serialize};

use super::de::{string_or_first, string_or_list};
use crate::catalog::CatalogRecord;
use crate::normalize::{normalize_magazine_key, published_year, split_list};

const COUNTRY: &str = "Japan";
const AGE_RATING: &str = "ADULTS_ONLY";

/// Reproducible identity hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityHashes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serie_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl IdentityHashes {
    fn is_empty(&self) -> bool {
        self.serie_hash.is_none() && self.hash.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub source: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationStatus {
    Complete,
    Magazine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslationStatus {
    Complete,
    Ongoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "DOUJINSHI")]
    Doujinshi,
    #[serde(rename = "HENTAI_MANGA")]
    Manga,
}

/// Synthesized output metadata.
///
/// Absent and empty values are omitted from the serialized document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    #[serde(rename = "atsumeru", default, skip_serializing_if = "IdentityHashes::is_empty")]
    pub identity: IdentityHashes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<SourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub translators: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub parodies: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub circles: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub magazines: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PublicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_status: Option<TranslationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub censorship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl OutputMetadata {
    /// Pretty JSON with four-space indentation.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn is_doujinshi(&self) -> bool {
        self.content_type == Some(ContentType::Doujinshi)
    }

    /// Whether any parody equals `marker`, ignoring case.
    pub fn has_parody(&self, marker: &str) -> bool {
        self.parodies.iter().any(|p| p.eq_ignore_ascii_case(marker))
    }
}

/// Builds output metadata from a catalog record.
///
/// This is a pure function of its arguments. Empty hash strings are omitted.
pub fn synthesize(
    record: &CatalogRecord,
    content_hash: &str,
    series_hash: &str,
    is_series_aggregate: bool,
    is_doujinshi_class: bool,
) -> OutputMetadata {
    let url = non_empty(&record.url);
    let links = url
        .as_ref()
        .map(|u| {
            vec![SourceLink {
                source: host_name(u),
                link: u.clone(),
            }]
        })
        .unwrap_or_default();

    let published = normalize_magazine_key(&record.magazine)
        .and_then(|key| published_year(&key.issue));

    OutputMetadata {
        identity: IdentityHashes {
            serie_hash: non_empty(series_hash),
            hash: non_empty(content_hash),
        },
        link: url,
        links,
        cover: non_empty(content_hash),
        title: non_empty(&record.title),
        alt_title: non_empty(&record.author),
        country: Some(COUNTRY.to_string()),
        publisher: non_empty(&record.publisher),
        published,
        event: non_empty(&record.event),
        description: non_empty(&record.description),
        authors: non_empty(&record.author),
        artists: split_list(&record.artists),
        languages: split_list(&record.language),
        translators: split_list(&record.translator),
        parodies: split_list(&record.parodies),
        circles: split_list(&record.circles),
        magazines: split_list(&record.magazine),
        tags: split_list(&record.tags),
        age_rating: Some(AGE_RATING.to_string()),
        status: Some(if is_series_aggregate {
            PublicationStatus::Magazine
        } else {
            PublicationStatus::Complete
        }),
        translation_status: Some(if is_series_aggregate {
            TranslationStatus::Ongoing
        } else {
            TranslationStatus::Complete
        }),
        censorship: non_empty(&record.censorship),
        content_type: Some(if is_doujinshi_class {
            ContentType::Doujinshi
        } else {
            ContentType::Manga
        }),
        color: non_empty(&record.color),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Host part of a URL without a leading `www.`.
fn host_name(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CatalogRecord {
        CatalogRecord {
            author: "Jane".into(),
            artists: "Jane, Bob".into(),
            tags: "romance, comedy,".into(),
            magazine: "COMIC Alpha 2021-03".into(),
            language: "English".into(),
            translator: "".into(),
            censorship: "UNCENSORED".into(),
            ..CatalogRecord::new("https://www.example.com/g/1", "Sample")
        }
    }

    #[test]
    fn test_synthesize_single_item() {
        let meta = synthesize(&record(), "h-content", "h-series", false, true);
        assert_eq!(meta.title.as_deref(), Some("Sample"));
        assert_eq!(meta.authors.as_deref(), Some("Jane"));
        assert_eq!(meta.artists, vec!["Jane", "Bob"]);
        assert_eq!(meta.tags, vec!["romance", "comedy"]);
        assert!(meta.translators.is_empty());
        assert_eq!(meta.published.as_deref(), Some("2021"));
        assert_eq!(meta.status, Some(PublicationStatus::Complete));
        assert_eq!(meta.translation_status, Some(TranslationStatus::Complete));
        assert_eq!(meta.content_type, Some(ContentType::Doujinshi));
        assert_eq!(meta.links[0].source, "example.com");
        assert_eq!(meta.identity.hash.as_deref(), Some("h-content"));
        assert_eq!(meta.cover.as_deref(), Some("h-content"));
    }

    #[test]
    fn test_synthesize_series_aggregate() {
        let meta = synthesize(&record(), "", "h-series", true, false);
        assert_eq!(meta.status, Some(PublicationStatus::Magazine));
        assert_eq!(meta.translation_status, Some(TranslationStatus::Ongoing));
        assert_eq!(meta.content_type, Some(ContentType::Manga));
        assert!(meta.identity.hash.is_none());
        assert!(meta.cover.is_none());
    }

    #[test]
    fn test_published_requires_20xx_issue() {
        let mut rec = record();
        rec.magazine = "Comic X Vol.1".into();
        assert!(synthesize(&rec, "a", "b", false, false).published.is_none());
        rec.magazine = "COMIC Beta 1999-01".into();
        assert!(synthesize(&rec, "a", "b", false, false).published.is_none());
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let rec = CatalogRecord::new("", "Only Title");
        let json = String::from_utf8(synthesize(&rec, "", "", false, false).to_json_bytes().unwrap())
            .unwrap();
        assert!(json.contains("\"title\": \"Only Title\""));
        assert!(!json.contains("\"artists\""));
        assert!(!json.contains("\"links\""));
        assert!(!json.contains("\"atsumeru\""));
        assert!(json.contains("\n    \"title\""));
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let a = synthesize(&record(), "c", "s", false, true).to_json_bytes().unwrap();
        let b = synthesize(&record(), "c", "s", false, true).to_json_bytes().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_prior_document() {
        let json = br#"{
            "atsumeru": {"serie_hash": "s", "hash": "h"},
            "title": "Sample",
            "authors": ["Jane"],
            "parodies": "Original Work",
            "status": "COMPLETE",
            "unknown_field": 1
        }"#;
        let meta = OutputMetadata::from_json_bytes(json).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Sample"));
        assert_eq!(meta.authors.as_deref(), Some("Jane"));
        assert!(meta.has_parody("original work"));
        assert_eq!(meta.identity.hash.as_deref(), Some("h"));
    }

    #[test]
    fn test_host_name() {
        assert_eq!(host_name("https://www.example.com/a?b"), "example.com");
        assert_eq!(host_name("http://x/a"), "x");
        assert_eq!(host_name("no-scheme.org/path"), "no-scheme.org");
    }
}
