//! Remote catalog integration (TMDB) and the cache-backed lookup client.
//!
//! Backends implement [`CatalogBackend`] and can fail; [`CatalogClient`]
//! layers the on-disk cache on top and never lets a remote failure escape
//! to its callers.

mod client;
mod tmdb;
mod types;

pub use client::CatalogClient;
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::{genre_name, Candidate, MediaKind};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying a remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for remote media catalog backends.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Search for candidates matching a title, optionally narrowed by year.
    async fn search(
        &self,
        title: &str,
        year: Option<&str>,
        kind: MediaKind,
    ) -> Result<Vec<Candidate>, CatalogError>;

    /// Download the poster image behind a candidate's poster path.
    async fn fetch_poster(&self, poster_path: &str) -> Result<Vec<u8>, CatalogError>;
}
