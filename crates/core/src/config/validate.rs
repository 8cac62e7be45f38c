use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Paths section exists (enforced by serde)
/// - Fuzzy threshold is a percentage
/// - Hash seed is not empty
/// - Input and output directories differ
/// - Scan parallelism is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.matching.fuzzy_threshold > 100 {
        return Err(ConfigError::ValidationError(format!(
            "matching.fuzzy_threshold must be between 0 and 100, got {}",
            config.matching.fuzzy_threshold
        )));
    }

    if config.metadata.hashes.hash_seed.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "metadata.hash_seed cannot be empty".to_string(),
        ));
    }

    if config.paths.input_dir == config.paths.output_dir {
        return Err(ConfigError::ValidationError(
            "paths.input_dir and paths.output_dir must differ".to_string(),
        ));
    }

    if config.run.scan_parallelism == 0 {
        return Err(ConfigError::ValidationError(
            "run.scan_parallelism cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn config() -> Config {
        load_config_from_str(
            r#"
[paths]
input_dir = "/in"
output_dir = "/out"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn test_validate_threshold_above_100_fails() {
        let mut config = config();
        config.matching.fuzzy_threshold = 101;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_threshold_bounds_pass() {
        let mut config = config();
        config.matching.fuzzy_threshold = 0;
        assert!(validate_config(&config).is_ok());
        config.matching.fuzzy_threshold = 100;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_seed_fails() {
        let mut config = config();
        config.metadata.hashes.hash_seed = " ".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_same_directories_fails() {
        let mut config = config();
        config.paths.output_dir = config.paths.input_dir.clone();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_parallelism_fails() {
        let mut config = config();
        config.run.scan_parallelism = 0;
        assert!(validate_config(&config).is_err());
    }
}
