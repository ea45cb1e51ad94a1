//! On-disk cache for fetched posters and synopsis/metadata records.
//!
//! Entries are flat files addressed by a [`CacheKey`] derived from the
//! normalized (title, year) pair, under a `posters/` and a `synopsis/`
//! subdirectory of the configured cache root.

mod store;
mod types;

pub use store::{CacheStore, CLEAR_WORKERS};
pub use types::{CacheKey, MetadataRecord};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when writing cache entries.
///
/// Reads never error: a missing or unreadable entry is a cache miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to create a cache directory.
    #[error("Failed to create cache directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a cache entry.
    #[error("Failed to write cache entry: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
