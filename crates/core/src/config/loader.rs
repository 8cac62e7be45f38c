use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};
use crate::normalize::CorrectionTables;

/// Load configuration from file with environment variable overrides
///
/// `COMICSHELF_RUN__MIGRATION=copy` overrides `[run] migration`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("COMICSHELF_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load correction tables, falling back to the built-in defaults
pub fn load_corrections(path: Option<&Path>) -> Result<CorrectionTables, ConfigError> {
    let Some(path) = path else {
        return Ok(CorrectionTables::default());
    };
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
    let tables = CorrectionTables::from_toml_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(
        path = %path.display(),
        title = tables.title.len(),
        issue_title = tables.issue_title.len(),
        publisher_aliases = tables.publisher_aliases.len(),
        publishers_by_title = tables.publishers_by_title.len(),
        ignored_magazines = tables.ignored_magazines.len(),
        "Loaded correction tables"
    );
    Ok(tables)
}
