use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one downloads directory is configured
/// - Destination paths are non-empty and distinct
/// - Retry attempts is at least 1
/// - TMDB API key is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.library.downloads_dirs.is_empty() {
        return Err(ConfigError::ValidationError(
            "library.downloads_dirs cannot be empty".to_string(),
        ));
    }

    if config.library.movies_dir.as_os_str().is_empty()
        || config.library.series_dir.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "library.movies_dir and library.series_dir cannot be empty".to_string(),
        ));
    }

    if config.library.movies_dir == config.library.series_dir {
        return Err(ConfigError::ValidationError(
            "library.movies_dir and library.series_dir must differ".to_string(),
        ));
    }

    if config.library.retry_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "library.retry_attempts cannot be 0".to_string(),
        ));
    }

    if config.tmdb.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key cannot be empty".to_string(),
        ));
    }

    Ok(())
}
