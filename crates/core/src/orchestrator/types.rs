//! Types for the run orchestrator.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions that abort a run before any file is touched.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The catalog could not be read.
    #[error("catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    /// The catalog index could not be built.
    #[error("index error: {0}")]
    Index(#[from] crate::catalog::IndexError),

    /// The input directory could not be scanned.
    #[error("scan error: {0}")]
    Scan(#[from] crate::scanner::ScanError),
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub scanned: usize,
    pub resolved: usize,
    pub skipped: usize,
    pub attached: usize,
    pub relocated: usize,
    pub series_documents: usize,
    pub directories_removed: usize,
}

/// Everything a run did not manage to do, plus counters.
///
/// Each list holds one plain-text line per failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Set when the run was interrupted between files.
    pub stopped: bool,
    pub counts: RunCounts,
    pub resolution_errors: Vec<String>,
    pub attach_errors: Vec<String>,
    pub relocate_errors: Vec<String>,
    pub cleanup_errors: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            stopped: false,
            counts: RunCounts::default(),
            resolution_errors: Vec::new(),
            attach_errors: Vec::new(),
            relocate_errors: Vec::new(),
            cleanup_errors: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn error_count(&self) -> usize {
        self.resolution_errors.len()
            + self.attach_errors.len()
            + self.relocate_errors.len()
            + self.cleanup_errors.len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// The error log: one headed section per non-empty list.
    pub fn to_log_text(&self) -> String {
        let sections = [
            ("Unable to find content for:", &self.resolution_errors),
            ("Unable to write metadata for:", &self.attach_errors),
            ("Unable to move or rename files:", &self.relocate_errors),
            ("Unable to clean up directories:", &self.cleanup_errors),
        ];

        let mut out = String::new();
        for (heading, lines) in sections {
            if lines.is_empty() {
                continue;
            }
            out.push_str(heading);
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Writes [`Self::to_log_text`] to `path`, replacing any earlier log.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_log_text())
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats an error with its whole source chain on one line.
pub(crate) fn error_line(error: &dyn std::error::Error) -> String {
    let mut line = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_report_writes_empty_log() {
        let report = RunReport::new();
        assert!(!report.has_errors());
        assert_eq!(report.to_log_text(), "");
    }

    #[test]
    fn test_log_sections_only_for_non_empty_lists() {
        let mut report = RunReport::new();
        report.resolution_errors.push("Unable to find content: /in/a.cbz".into());
        report.relocate_errors.push("Duplicate file: [a] already exists at [b]".into());

        let text = report.to_log_text();
        assert_eq!(
            text,
            "Unable to find content for:\nUnable to find content: /in/a.cbz\n\n\
             Unable to move or rename files:\nDuplicate file: [a] already exists at [b]\n\n"
        );
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_write_to_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/errors.log");
        let mut report = RunReport::new();
        report.cleanup_errors.push("Unable to remove directory: /out/x".into());
        report.write_to(&path).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .starts_with("Unable to clean up directories:\n"));
    }

    #[test]
    fn test_error_line_includes_sources() {
        let err = crate::reorganizer::RelocateError::copy_failed(
            "/in/a.cbz".into(),
            "/out/a.cbz".into(),
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(
            error_line(&err),
            "Unable to copy [/in/a.cbz] to [/out/a.cbz]: disk full"
        );
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::Index(crate::catalog::IndexError::EmptyCatalog);
        assert_eq!(
            err.to_string(),
            "index error: Catalog is empty, nothing to match against"
        );
    }
}
