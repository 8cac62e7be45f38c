//! The human-authored YAML sidecar found inside most raw archives.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::de::{string_or_first, string_or_list};

/// A `- - ` list marker at the start of a line.
static NESTED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([ \t]*)- - ").unwrap());

/// Errors parsing a sidecar document.
#[derive(Debug, Error)]
pub enum SidecarError {
    #[error("Sidecar is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed sidecar fields. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sidecar {
    #[serde(rename = "URL", default, deserialize_with = "string_or_first")]
    pub url: Option<String>,

    #[serde(rename = "Title", default, deserialize_with = "string_or_first")]
    pub title: Option<String>,

    #[serde(rename = "Artist", default, deserialize_with = "string_or_list")]
    pub artists: Vec<String>,

    #[serde(rename = "Parody", default, deserialize_with = "string_or_list")]
    pub parodies: Vec<String>,

    #[serde(rename = "Circle", default, deserialize_with = "string_or_list")]
    pub circles: Vec<String>,

    #[serde(rename = "Publisher", default, deserialize_with = "string_or_list")]
    pub publishers: Vec<String>,

    #[serde(rename = "Event", default, deserialize_with = "string_or_first")]
    pub event: Option<String>,

    #[serde(rename = "Magazine", default, deserialize_with = "string_or_list")]
    pub magazines: Vec<String>,

    #[serde(rename = "Tags", default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,

    #[serde(rename = "Description", default, deserialize_with = "string_or_first")]
    pub description: Option<String>,
}

impl Sidecar {
    /// Parses sidecar bytes.
    ///
    /// Some dumps nest list items as `- - value`; those line-leading markers
    /// are flattened to a plain list before parsing. Values are left as is.
    pub fn parse(bytes: &[u8]) -> Result<Self, SidecarError> {
        let raw = String::from_utf8_lossy(bytes);
        let text = NESTED_ITEM.replace_all(&raw, "${1}  - ");
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn first_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }

    pub fn first_magazine(&self) -> Option<&str> {
        self.magazines.first().map(String::as_str)
    }

    pub fn first_publisher(&self) -> Option<&str> {
        self.publishers.first().map(String::as_str)
    }
}

/// Whether an archive entry name looks like a sidecar document.
pub fn is_sidecar_entry(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_sidecar() {
        let yaml = r#"
URL: http://x/a
Title: Sample
Artist:
  - Jane
  - Bob
Parody: Original Work
Circle: Some Circle
Publisher:
  - FAKKU
Event: C99
Magazine:
  - Comic X Vol.1
Tags: [a, b]
Description: A story.
Pages: 24
"#;
        let sidecar = Sidecar::parse(yaml.as_bytes()).unwrap();
        assert_eq!(sidecar.url(), Some("http://x/a"));
        assert_eq!(sidecar.title(), Some("Sample"));
        assert_eq!(sidecar.artists, vec!["Jane", "Bob"]);
        assert_eq!(sidecar.parodies, vec!["Original Work"]);
        assert_eq!(sidecar.circles, vec!["Some Circle"]);
        assert_eq!(sidecar.first_publisher(), Some("FAKKU"));
        assert_eq!(sidecar.event.as_deref(), Some("C99"));
        assert_eq!(sidecar.first_magazine(), Some("Comic X Vol.1"));
        assert_eq!(sidecar.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_nested_dash_lists() {
        let yaml = "Title: Sample\nArtist:\n- - Jane\n- - Bob\n";
        let sidecar = Sidecar::parse(yaml.as_bytes()).unwrap();
        assert_eq!(sidecar.artists, vec!["Jane", "Bob"]);
    }

    #[test]
    fn test_dash_pairs_inside_values_are_kept() {
        let yaml = "Title: Before - - After\nTags:\n- - x - - y\n";
        let sidecar = Sidecar::parse(yaml.as_bytes()).unwrap();
        assert_eq!(sidecar.title(), Some("Before - - After"));
        assert_eq!(sidecar.tags, vec!["x - - y"]);
    }

    #[test]
    fn test_numeric_title_and_missing_fields() {
        let sidecar = Sidecar::parse(b"Title: 1984\n").unwrap();
        assert_eq!(sidecar.title(), Some("1984"));
        assert!(sidecar.url().is_none());
        assert!(sidecar.artists.is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Sidecar::parse(b"  \n").unwrap(), Sidecar::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(Sidecar::parse(b"Title: [unclosed").is_err());
    }

    #[test]
    fn test_sidecar_entry_names() {
        assert!(is_sidecar_entry("info.yaml"));
        assert!(is_sidecar_entry("META/Info.YML"));
        assert!(!is_sidecar_entry("book_info.json"));
    }
}
