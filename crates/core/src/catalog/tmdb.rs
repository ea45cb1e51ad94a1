//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Candidate, MediaKind};
use super::{CatalogBackend, CatalogError};

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters (default: https://image.tmdb.org/t/p/w500).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        let image_base_url = config
            .image_base_url
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            image_base_url,
        })
    }

    /// Search movies (and anything else TMDB's multi index matches).
    async fn search_multi(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> Result<Vec<Candidate>, CatalogError> {
        let url = format!("{}/search/multi", self.base_url);

        debug!("TMDB multi search: query='{}', year={:?}", query, year);

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key), ("query", &query.to_string())]);

        if let Some(y) = year {
            request = request.query(&[("year", y)]);
        }

        let response = check_status(request.send().await?).await?;

        let search_result: TmdbSearchResponse<TmdbMultiResult> =
            response.json().await.map_err(|e| {
                CatalogError::ParseError(format!("Failed to parse multi search response: {}", e))
            })?;

        Ok(search_result.results.into_iter().map(|r| r.into()).collect())
    }

    /// Search TV series.
    async fn search_tv(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> Result<Vec<Candidate>, CatalogError> {
        let url = format!("{}/search/tv", self.base_url);

        debug!("TMDB TV search: query='{}', year={:?}", query, year);

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key), ("query", &query.to_string())]);

        if let Some(y) = year {
            request = request.query(&[("first_air_date_year", y)]);
        }

        let response = check_status(request.send().await?).await?;

        let search_result: TmdbSearchResponse<TmdbTvResult> =
            response.json().await.map_err(|e| {
                CatalogError::ParseError(format!("Failed to parse TV search response: {}", e))
            })?;

        Ok(search_result.results.into_iter().map(|r| r.into()).collect())
    }
}

#[async_trait]
impl CatalogBackend for TmdbClient {
    async fn search(
        &self,
        title: &str,
        year: Option<&str>,
        kind: MediaKind,
    ) -> Result<Vec<Candidate>, CatalogError> {
        match kind {
            MediaKind::Movie => self.search_multi(title, year).await,
            MediaKind::Series => self.search_tv(title, year).await,
        }
    }

    async fn fetch_poster(&self, poster_path: &str) -> Result<Vec<u8>, CatalogError> {
        let url = format!("{}{}", self.image_base_url, poster_path);

        debug!("TMDB poster fetch: {}", url);

        let response = check_status(self.client.get(&url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Map TMDB's status codes to catalog errors, passing success through.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status == 401 {
        return Err(CatalogError::NotConfigured(
            "Invalid TMDB API key".to_string(),
        ));
    }
    if status == 429 {
        return Err(CatalogError::RateLimitExceeded);
    }
    if status == 404 {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::NotFound(body));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response)
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMultiResult {
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvResult {
    name: String,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

// ============================================================================
// Conversions
// ============================================================================

/// First 4 bytes of a date string, dropped when empty, too short, or not
/// on a char boundary (a garbled non-ASCII date is no year at all).
fn year_of(date: Option<String>) -> Option<String> {
    date.and_then(|d| d.get(..4).map(str::to_string))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

impl From<TmdbMultiResult> for Candidate {
    fn from(r: TmdbMultiResult) -> Self {
        Self {
            name: r.title.or(r.name).unwrap_or_default(),
            year: year_of(r.release_date).or_else(|| year_of(r.first_air_date)),
            overview: non_empty(r.overview),
            // Backdrop stands in when a result has no real poster.
            poster_path: non_empty(r.poster_path).or_else(|| non_empty(r.backdrop_path)),
            rating: r.vote_average,
            genre_ids: r.genre_ids,
        }
    }
}

impl From<TmdbTvResult> for Candidate {
    fn from(r: TmdbTvResult) -> Self {
        Self {
            name: r.name,
            year: year_of(r.first_air_date),
            overview: non_empty(r.overview),
            poster_path: non_empty(r.poster_path),
            rating: r.vote_average,
            genre_ids: r.genre_ids,
        }
    }
}
