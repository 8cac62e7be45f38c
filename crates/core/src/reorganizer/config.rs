//! Configuration for the reorganizer module.

use serde::{Deserialize, Serialize};

/// Placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorganizerConfig {
    /// Buffer size for file copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Whether to try a same-filesystem link-and-unlink move before copying.
    #[serde(default = "default_true")]
    pub prefer_atomic_moves: bool,

    /// Whether to compare SHA-256 of source and copy before removing the source.
    #[serde(default)]
    pub verify_checksums: bool,

    /// Extension of renamed archives.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Substrings of the original name that mark a high-resolution scan.
    #[serde(default = "default_quality_markers")]
    pub quality_markers: Vec<String>,

    /// Written as ` (suffix)` when a quality marker is present.
    #[serde(default = "default_quality_suffix")]
    pub quality_suffix: String,
}

fn default_buffer_size() -> usize {
    8 * 1024 * 1024 // 8 MB
}

fn default_true() -> bool {
    true
}

fn default_output_extension() -> String {
    "cbz".to_string()
}

fn default_quality_markers() -> Vec<String> {
    vec!["x3200".to_string(), "x3199".to_string(), "x3100".to_string()]
}

fn default_quality_suffix() -> String {
    "x3200".to_string()
}

impl Default for ReorganizerConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            prefer_atomic_moves: true,
            verify_checksums: false,
            output_extension: default_output_extension(),
            quality_markers: default_quality_markers(),
            quality_suffix: default_quality_suffix(),
        }
    }
}

impl ReorganizerConfig {
    pub fn with_atomic_moves(mut self, enabled: bool) -> Self {
        self.prefer_atomic_moves = enabled;
        self
    }

    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReorganizerConfig::default();
        assert_eq!(config.buffer_size, 8 * 1024 * 1024);
        assert!(config.prefer_atomic_moves);
        assert!(!config.verify_checksums);
        assert_eq!(config.output_extension, "cbz");
        assert_eq!(config.quality_markers.len(), 3);
    }

    #[test]
    fn test_config_builder() {
        let config = ReorganizerConfig::default()
            .with_atomic_moves(false)
            .with_checksum_verification(true)
            .with_buffer_size(1024);

        assert!(!config.prefer_atomic_moves);
        assert!(config.verify_checksums);
        assert_eq!(config.buffer_size, 1024);
    }
}
