//! Publisher detection from archive filenames.

use super::corrections::{CorrectionTables, ReplacementPair, TitlePublisher};

/// Bracket tags that describe the scan rather than who published it.
const NON_PUBLISHER_TAGS: &[&str] = &[
    "digital",
    "english",
    "decensored",
    "uncensored",
    "png",
    "full color",
    "colorized",
];

/// Finds the publisher tag in names like `[Author] Title [Publisher].cbz`.
#[derive(Debug, Clone, Default)]
pub struct PublisherDetector {
    aliases: Vec<ReplacementPair>,
    by_title: Vec<TitlePublisher>,
}

impl PublisherDetector {
    pub fn new(tables: &CorrectionTables) -> Self {
        Self {
            aliases: tables.publisher_aliases.clone(),
            by_title: tables.publishers_by_title.clone(),
        }
    }

    /// The publisher of a file, from its trailing bracket tag or, failing
    /// that, from the title lookup table.
    pub fn from_filename(&self, file_name: &str) -> Option<String> {
        let name = file_name.replace("(1)", "");
        self.tagged_publisher(&name)
            .map(|raw| self.apply_aliases(raw.trim()))
            .filter(|p| !p.is_empty())
            .or_else(|| self.publisher_by_title(&name))
    }

    /// Maps a raw publisher value through the alias table.
    pub fn apply_aliases(&self, publisher: &str) -> String {
        self.aliases
            .iter()
            .find(|pair| pair.from.eq_ignore_ascii_case(publisher))
            .map(|pair| pair.to.clone())
            .unwrap_or_else(|| publisher.to_string())
    }

    fn tagged_publisher<'a>(&self, name: &'a str) -> Option<&'a str> {
        let mut end = name.len();
        // Walk bracket groups right to left, skipping the leading credit.
        while let Some(close) = name[..end].rfind(']') {
            let open = name[..close].rfind('[')?;
            if is_leading(&name[..open]) {
                return None;
            }
            let content = &name[open + 1..close];
            if !is_scan_tag(content) {
                return Some(content);
            }
            end = open;
        }
        None
    }

    fn publisher_by_title(&self, name: &str) -> Option<String> {
        self.by_title
            .iter()
            .find(|entry| name.contains(entry.title.as_str()))
            .map(|entry| entry.publisher.clone())
    }
}

/// Whether only an `(event)` prefix, or nothing, precedes a bracket group.
fn is_leading(prefix: &str) -> bool {
    let p = prefix.trim();
    p.is_empty() || (p.starts_with('(') && p.ends_with(')') && !p[1..].contains('('))
}

fn is_scan_tag(content: &str) -> bool {
    let lower = content.trim().to_lowercase();
    if lower.is_empty() || NON_PUBLISHER_TAGS.contains(&lower.as_str()) {
        return true;
    }
    // Quality tags such as x3200.
    let mut chars = lower.chars();
    chars.next() == Some('x') && chars.clone().next().is_some() && chars.all(|c| c.is_ascii_digit())
}
