//! Scanned input files.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::metadata::{OutputMetadata, Sidecar};
use crate::normalize::{CorrectionTables, PublisherDetector};

/// Trailing `(Magazine Issue)` group of names like `[A] Title (COMIC X 2021-03).cbz`.
static FILENAME_MAGAZINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) \(([^()]+)\)\.(?:cbz|zip)$").unwrap());

/// One input archive as found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Embedded human-authored sidecar, if readable.
    pub sidecar: Option<Sidecar>,
    /// Metadata this tool wrote on an earlier run.
    pub prior: Option<OutputMetadata>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sidecar: None,
            prior: None,
        }
    }

    pub fn with_sidecar(mut self, sidecar: Sidecar) -> Self {
        self.sidecar = Some(sidecar);
        self
    }

    pub fn with_prior(mut self, prior: OutputMetadata) -> Self {
        self.prior = Some(prior);
        self
    }

    pub fn file_name(&self) -> &str {
        file_name_of(&self.path)
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Name of the directory holding the file.
    pub fn parent_name(&self) -> &str {
        self.path.parent().map(file_name_of).unwrap_or_default()
    }

    pub fn has_prior_metadata(&self) -> bool {
        self.prior.is_some()
    }

    /// Source URL from the sidecar, else from earlier output.
    pub fn url(&self) -> Option<&str> {
        self.sidecar
            .as_ref()
            .and_then(Sidecar::url)
            .or_else(|| {
                self.prior
                    .as_ref()
                    .and_then(|p| p.link.as_deref())
                    .filter(|l| !l.trim().is_empty())
            })
    }

    /// Raw `Name Issue` magazine value, if any.
    ///
    /// Values listed as not being magazines are discarded.
    pub fn magazine(&self, tables: &CorrectionTables) -> Option<String> {
        let from_sidecar = self
            .sidecar
            .as_ref()
            .and_then(Sidecar::first_magazine)
            .map(str::to_string);
        let from_prior = || {
            self.prior
                .as_ref()
                .and_then(|p| p.magazines.first().cloned())
        };
        let from_name = || {
            let name = self.file_name().replace("(1)", "");
            FILENAME_MAGAZINE
                .captures(&name)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
        };

        from_sidecar
            .filter(|m| !m.trim().is_empty())
            .or_else(from_prior)
            .or_else(from_name)
            .filter(|m| !m.trim().is_empty() && !tables.is_ignored_magazine(m))
    }

    /// Publisher from earlier output, the sidecar, or the file name.
    pub fn publisher(&self, detector: &PublisherDetector) -> Option<String> {
        if let Some(p) = self.prior.as_ref().and_then(|p| p.publisher.clone()) {
            return Some(p);
        }
        if let Some(p) = self.sidecar.as_ref().and_then(Sidecar::first_publisher) {
            let p = detector.apply_aliases(p.trim());
            if !p.is_empty() {
                return Some(p);
            }
        }
        detector.from_filename(self.file_name())
    }
}

fn file_name_of(path: &Path) -> &str {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::ReplacementPair;

    fn sidecar(yaml: &str) -> Sidecar {
        Sidecar::parse(yaml.as_bytes()).unwrap()
    }

    #[test]
    fn test_names() {
        let file = FileRecord::new("/in/Comic X/[Jane] Sample.cbz");
        assert_eq!(file.file_name(), "[Jane] Sample.cbz");
        assert_eq!(file.stem(), "[Jane] Sample");
        assert_eq!(file.parent_name(), "Comic X");
    }

    #[test]
    fn test_url_prefers_sidecar() {
        let prior = OutputMetadata {
            link: Some("http://x/prior".into()),
            ..Default::default()
        };
        let file = FileRecord::new("/in/a.cbz").with_prior(prior.clone());
        assert_eq!(file.url(), Some("http://x/prior"));

        let file = file.with_sidecar(sidecar("URL: http://x/a\n"));
        assert_eq!(file.url(), Some("http://x/a"));

        assert!(FileRecord::new("/in/a.cbz").url().is_none());
    }

    #[test]
    fn test_magazine_sources() {
        let tables = CorrectionTables::default();

        let file = FileRecord::new("/in/[A] Story (COMIC X 2021-03).cbz");
        assert_eq!(file.magazine(&tables).as_deref(), Some("COMIC X 2021-03"));

        let file = file.with_sidecar(sidecar("Magazine: Comic Y Vol.2\n"));
        assert_eq!(file.magazine(&tables).as_deref(), Some("Comic Y Vol.2"));

        let prior = OutputMetadata {
            magazines: vec!["Comic Z #4".into()],
            ..Default::default()
        };
        let file = FileRecord::new("/in/[A] Story.cbz").with_prior(prior);
        assert_eq!(file.magazine(&tables).as_deref(), Some("Comic Z #4"));

        assert!(FileRecord::new("/in/[A] Story.cbz").magazine(&tables).is_none());
    }

    #[test]
    fn test_ignored_magazine_is_dropped() {
        let tables = CorrectionTables {
            ignored_magazines: vec!["Irodori Comics".into()],
            ..Default::default()
        };
        let file = FileRecord::new("/in/a.cbz").with_sidecar(sidecar("Magazine: irodori comics\n"));
        assert!(file.magazine(&tables).is_none());
    }

    #[test]
    fn test_publisher_sources() {
        let tables = CorrectionTables {
            publisher_aliases: vec![ReplacementPair::new("Fakku!", "FAKKU")],
            ..Default::default()
        };
        let detector = PublisherDetector::new(&tables);

        let file = FileRecord::new("/in/[Jane] Sample [Press].cbz");
        assert_eq!(file.publisher(&detector).as_deref(), Some("Press"));

        let file = file.with_sidecar(sidecar("Publisher: Fakku!\n"));
        assert_eq!(file.publisher(&detector).as_deref(), Some("FAKKU"));

        let prior = OutputMetadata {
            publisher: Some("Earlier".into()),
            ..Default::default()
        };
        let file = file.with_prior(prior);
        assert_eq!(file.publisher(&detector).as_deref(), Some("Earlier"));

        assert!(FileRecord::new("/in/[Jane] Sample.cbz")
            .publisher(&detector)
            .is_none());
    }
}
