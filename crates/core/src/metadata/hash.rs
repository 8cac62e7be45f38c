//! Reproducible identity hashes.

use serde::{Deserialize, Serialize};

/// Seed and prefixes for identity hashes.
///
/// A hash is `prefix + md5(seed + lowercase name)`, so re-running over the
/// same library yields the same identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    #[serde(default = "default_seed")]
    pub hash_seed: String,

    #[serde(default = "default_content_prefix")]
    pub content_hash_prefix: String,

    #[serde(default = "default_series_prefix")]
    pub series_hash_prefix: String,
}

fn default_seed() -> String {
    "comicshelf".to_string()
}

fn default_content_prefix() -> String {
    "atsumeru".to_string()
}

fn default_series_prefix() -> String {
    "atsumeru-serie".to_string()
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            hash_seed: default_seed(),
            content_hash_prefix: default_content_prefix(),
            series_hash_prefix: default_series_prefix(),
        }
    }
}

impl HashConfig {
    /// Hash of one archive, from its file name.
    pub fn content_hash(&self, file_name: &str) -> String {
        self.hash_with(&self.content_hash_prefix, file_name)
    }

    /// Hash of a series, from the file or issue folder name that stands for it.
    pub fn series_hash(&self, name: &str) -> String {
        self.hash_with(&self.series_hash_prefix, name)
    }

    fn hash_with(&self, prefix: &str, name: &str) -> String {
        let digest = md5::compute(format!("{}{}", self.hash_seed, name.to_lowercase()));
        format!("{prefix}{digest:x}")
    }
}
