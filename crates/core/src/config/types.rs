use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metadata::HashConfig;
use crate::orchestrator::RunConfig;
use crate::reorganizer::ReorganizerConfig;
use crate::resolver::{ResolverConfig, ScorerKind};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub placement: ReorganizerConfig,
}

/// Input, output and data file locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_catalog_db")]
    pub catalog_db: PathBuf,
    /// Correction tables (TOML). Built-in defaults when absent.
    #[serde(default)]
    pub corrections: Option<PathBuf>,
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
    /// Prometheus text dump written after the run.
    #[serde(default)]
    pub metrics_file: Option<PathBuf>,
}

fn default_catalog_db() -> PathBuf {
    PathBuf::from("catalog.db")
}

fn default_error_log() -> PathBuf {
    PathBuf::from("errors.log")
}

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchingConfig {
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,
    #[serde(default)]
    pub scorer: ScorerKind,
    /// Magazine value used by the self-published storefront.
    #[serde(default = "default_self_published_alias")]
    pub self_published_alias: String,
    /// Parody value marking an original work.
    #[serde(default = "default_original_work_parody")]
    pub original_work_parody: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            scorer: ScorerKind::default(),
            self_published_alias: default_self_published_alias(),
            original_work_parody: default_original_work_parody(),
        }
    }
}

impl MatchingConfig {
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::default()
            .with_fuzzy_threshold(self.fuzzy_threshold)
            .with_scorer(self.scorer)
    }
}

fn default_fuzzy_threshold() -> u8 {
    85
}

fn default_self_published_alias() -> String {
    "FAKKU".to_string()
}

fn default_original_work_parody() -> String {
    "Original Work".to_string()
}

/// Output document configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(flatten)]
    pub hashes: HashConfig,
    #[serde(default = "default_book_info_entry")]
    pub book_info_entry: String,
    #[serde(default = "default_series_info_file")]
    pub series_info_file: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            hashes: HashConfig::default(),
            book_info_entry: default_book_info_entry(),
            series_info_file: default_series_info_file(),
        }
    }
}

fn default_book_info_entry() -> String {
    crate::archive::DEFAULT_METADATA_ENTRY.to_string()
}

fn default_series_info_file() -> String {
    crate::orchestrator::DEFAULT_SERIES_INFO_FILE.to_string()
}
