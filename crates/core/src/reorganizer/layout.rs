//! Destination directory and filename rules.

use std::path::PathBuf;

use super::config::ReorganizerConfig;
use super::types::{Classification, PlacementInput, ResortMode};
use crate::normalize::sanitize_for_filesystem;

const UNKNOWN: &str = "Unknown";

/// Pure path computation; nothing here touches the filesystem.
#[derive(Debug, Clone)]
pub struct Layout {
    self_published_alias: String,
    original_work_parody: String,
    output_extension: String,
    quality_markers: Vec<String>,
    quality_suffix: String,
}

impl Layout {
    pub fn new(
        config: &ReorganizerConfig,
        self_published_alias: impl Into<String>,
        original_work_parody: impl Into<String>,
    ) -> Self {
        Self {
            self_published_alias: self_published_alias.into(),
            original_work_parody: original_work_parody.into(),
            output_extension: config.output_extension.clone(),
            quality_markers: config.quality_markers.clone(),
            quality_suffix: config.quality_suffix.clone(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&ReorganizerConfig::default(), "FAKKU", "Original Work")
    }

    pub fn classify(&self, input: &PlacementInput<'_>) -> Classification {
        if self.magazine_of(input).is_some() {
            Classification::Magazine
        } else if input.metadata.has_parody(&self.original_work_parody) {
            Classification::Book
        } else {
            Classification::Doujinshi
        }
    }

    /// Directory relative to the output root.
    pub fn destination_dir(&self, input: &PlacementInput<'_>, resort: ResortMode) -> PathBuf {
        let classification = self.classify(input);
        let mut dir = PathBuf::from(classification.folder());

        if let Some(key) = self.magazine_of(input) {
            dir.push(sanitize_for_filesystem(key.name.trim()));
            dir.push(sanitize_for_filesystem(&key.issue_key()));
            return dir;
        }

        let group = match resort {
            ResortMode::ByPublisher => input.publisher.map(str::trim),
            ResortMode::ByAuthor => input.metadata.authors.as_deref().map(str::trim),
        };
        let group = group.filter(|g| !g.is_empty()).unwrap_or(UNKNOWN);
        dir.push(sanitize_for_filesystem(group));
        dir
    }

    /// `(event) [author] title (quality).ext`
    pub fn file_name(&self, input: &PlacementInput<'_>) -> String {
        let file = input.file;
        let meta = input.metadata;
        let sidecar = file.sidecar.as_ref();

        let event = meta
            .event
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| format!("({}) ", sanitize_for_filesystem(e)))
            .unwrap_or_default();

        let author = meta
            .authors
            .as_deref()
            .or_else(|| sidecar.and_then(|s| s.first_artist()))
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN);

        let title = meta
            .title
            .as_deref()
            .or_else(|| sidecar.and_then(|s| s.title()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| file.stem());

        let original = file.file_name().to_lowercase();
        let quality = if self
            .quality_markers
            .iter()
            .any(|m| original.contains(&m.to_lowercase()))
        {
            format!(" ({})", self.quality_suffix)
        } else {
            String::new()
        };

        format!(
            "{event}[{}] {}{quality}.{}",
            sanitize_for_filesystem(author),
            sanitize_for_filesystem(title),
            self.output_extension
        )
    }

    /// Output-relative destination path.
    pub fn relative_path(&self, input: &PlacementInput<'_>, resort: ResortMode) -> PathBuf {
        self.destination_dir(input, resort).join(self.file_name(input))
    }

    /// The magazine key, unless the issue names the self-published alias
    /// anywhere in it (case-sensitive, as the storefront writes it).
    fn magazine_of<'a>(&self, input: &PlacementInput<'a>) -> Option<&'a crate::normalize::MagazineKey> {
        input
            .magazine
            .filter(|key| !key.issue_key().contains(self.self_published_alias.as_str()))
    }
}
