use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::TmdbConfig;
use crate::organizer::OrganizerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub library: LibraryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub tmdb: TmdbConfig,
}

/// Library directory layout and organizer behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directories scanned for downloaded media files.
    pub downloads_dirs: Vec<PathBuf>,
    /// Destination directory for movies.
    pub movies_dir: PathBuf,
    /// Destination root for series.
    pub series_dir: PathBuf,
    /// Total move attempts on a permission failure (default: 3).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Seconds between retry attempts (default: 5).
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl LibraryConfig {
    /// Build the organizer configuration for these directories.
    pub fn organizer_config(&self) -> OrganizerConfig {
        let mut config = OrganizerConfig::new(
            self.downloads_dirs.clone(),
            self.movies_dir.clone(),
            self.series_dir.clone(),
        );
        config.retry_attempts = self.retry_attempts;
        config.retry_delay = Duration::from_secs(self.retry_delay_secs);
        config
    }
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

/// Poster/metadata cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache root directory, holding posters/ and synopsis/.
    #[serde(default = "default_cache_root")]
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
        }
    }
}

fn default_cache_root() -> PathBuf {
    PathBuf::from(".mediaflix-cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_valid_config() {
        let toml = r#"
[library]
downloads_dirs = ["/downloads"]
movies_dir = "/media/movies"
series_dir = "/media/series"

[tmdb]
api_key = "test-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.library.downloads_dirs.len(), 1);
        assert_eq!(config.library.movies_dir.to_str().unwrap(), "/media/movies");
        assert_eq!(config.tmdb.api_key, "test-key");
    }

    #[test]
    fn test_deserialize_with_default_cache_and_retries() {
        let toml = r#"
[library]
downloads_dirs = ["/downloads"]
movies_dir = "/media/movies"
series_dir = "/media/series"

[tmdb]
api_key = "test-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.root.to_str().unwrap(), ".mediaflix-cache");
        assert_eq!(config.library.retry_attempts, 3);
        assert_eq!(config.library.retry_delay_secs, 5);
    }

    #[test]
    fn test_deserialize_missing_tmdb_fails() {
        let toml = r#"
[library]
downloads_dirs = ["/downloads"]
movies_dir = "/media/movies"
series_dir = "/media/series"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_with_custom_cache_root() {
        let toml = r#"
[library]
downloads_dirs = ["/downloads"]
movies_dir = "/media/movies"
series_dir = "/media/series"

[cache]
root = "/var/cache/mediaflix"

[tmdb]
api_key = "test-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.root.to_str().unwrap(), "/var/cache/mediaflix");
    }

    #[test]
    fn test_organizer_config_conversion() {
        let library = LibraryConfig {
            downloads_dirs: vec![PathBuf::from("/downloads")],
            movies_dir: PathBuf::from("/media/movies"),
            series_dir: PathBuf::from("/media/series"),
            retry_attempts: 5,
            retry_delay_secs: 1,
        };

        let organizer = library.organizer_config();
        assert_eq!(organizer.retry_attempts, 5);
        assert_eq!(organizer.retry_delay, Duration::from_secs(1));
        assert_eq!(organizer.movies_dir.to_str().unwrap(), "/media/movies");
    }
}
