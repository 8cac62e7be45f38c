//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use crate::reorganizer::{MigrationMode, ResortMode};

/// Per-run behavior of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Move files out of the input directory, or copy and leave them.
    #[serde(default)]
    pub migration: MigrationMode,

    /// Group loose files by publisher or by author.
    #[serde(default)]
    pub resort: ResortMode,

    /// Resolve and rewrite files that already carry output metadata.
    /// When off, such files are only re-sorted.
    #[serde(default)]
    pub rewrite_metadata: bool,

    /// Archives read concurrently during the scan.
    #[serde(default = "default_scan_parallelism")]
    pub scan_parallelism: usize,
}

fn default_scan_parallelism() -> usize {
    4
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            migration: MigrationMode::default(),
            resort: ResortMode::default(),
            rewrite_metadata: false,
            scan_parallelism: default_scan_parallelism(),
        }
    }
}
