pub mod cache;
pub mod catalog;
pub mod config;
pub mod library;
pub mod organizer;
pub mod parser;
pub mod testing;

pub use cache::{CacheError, CacheKey, CacheStore, MetadataRecord};
pub use catalog::{
    Candidate, CatalogBackend, CatalogClient, CatalogError, MediaKind, TmdbClient, TmdbConfig,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use library::{Library, LibraryEntry, SeriesEntry};
pub use organizer::{OrganizeReport, Organizer, OrganizerConfig, OrganizerError};
pub use parser::{extract_series_info, extract_year, is_media_file, MediaFileName, SeriesInfo};
