//! Cache-backed catalog lookups.
//!
//! The client resolves posters and metadata through the on-disk cache
//! first and only then asks the remote backend. Remote failures are
//! logged and absorbed here: callers always get a value back.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStore, MetadataRecord};

use super::{CatalogBackend, Candidate, MediaKind};

/// Poster and metadata resolver over a cache and a remote backend.
pub struct CatalogClient {
    backend: Arc<dyn CatalogBackend>,
    cache: Arc<CacheStore>,
}

impl CatalogClient {
    pub fn new(backend: Arc<dyn CatalogBackend>, cache: Arc<CacheStore>) -> Self {
        Self { backend, cache }
    }

    /// Resolve a poster image for a title.
    ///
    /// Order: exact cache key, closest cached entry by title prefix and
    /// year, remote search. A remote hit is persisted under the exact key
    /// before returning. `None` means no poster anywhere; the caller
    /// substitutes its own placeholder.
    pub async fn find_poster(
        &self,
        title: &str,
        year: Option<&str>,
        kind: MediaKind,
    ) -> Option<Vec<u8>> {
        let key = CacheKey::new(title, year);
        if let Some(bytes) = self.cache.get_poster(&key).await {
            return Some(bytes);
        }
        if let Some(bytes) = self.cache.closest_poster(title, year).await {
            return Some(bytes);
        }

        let candidates = match self.backend.search(title, year, kind).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("catalog search for '{}' failed: {}", title, e);
                return None;
            }
        };
        let chosen = select_candidate(&candidates, title, year, |c| c.poster_path.is_some())?;
        let poster_path = chosen.poster_path.as_deref()?;

        let bytes = match self.backend.fetch_poster(poster_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("poster fetch for '{}' failed: {}", title, e);
                return None;
            }
        };

        if let Err(e) = self.cache.put_poster(&key, &bytes).await {
            warn!("failed to cache poster for '{}': {}", title, e);
        }
        Some(bytes)
    }

    /// Resolve synopsis/rating/genre metadata for a title.
    ///
    /// Checks only the exact cache key, then the remote backend. On any
    /// failure an empty record carrying the originally-known year comes
    /// back instead of an error.
    pub async fn find_metadata(
        &self,
        title: &str,
        year: Option<&str>,
        kind: MediaKind,
    ) -> MetadataRecord {
        let key = CacheKey::new(title, year);
        if let Some(record) = self.cache.get_metadata(&key).await {
            return record;
        }

        let candidates = match self.backend.search(title, year, kind).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("catalog search for '{}' failed: {}", title, e);
                return MetadataRecord::empty(year);
            }
        };
        let Some(chosen) = select_candidate(&candidates, title, year, |c| c.overview.is_some())
        else {
            debug!("no metadata candidate for '{}'", title);
            return MetadataRecord::empty(year);
        };

        let record = MetadataRecord {
            rating: chosen.rating,
            genres: chosen.genre_names(),
            year: chosen.year.clone().or_else(|| year.map(str::to_string)),
            synopsis: chosen.overview.clone().unwrap_or_default(),
        };

        if let Err(e) = self.cache.put_metadata(&key, &record).await {
            warn!("failed to cache metadata for '{}': {}", title, e);
        }
        record
    }
}

/// Pick the best candidate that carries the needed field.
///
/// Scoring: 100 for an exact case-insensitive name match, else 50 when the
/// requested title is a substring of the candidate name, plus 100 when a
/// known year matches the candidate's year exactly. The strictly highest
/// score wins and ties keep the first-seen candidate, so with every score
/// at zero this degrades to "first candidate with the field".
fn select_candidate<'a>(
    candidates: &'a [Candidate],
    title: &str,
    year: Option<&str>,
    has_field: impl Fn(&Candidate) -> bool,
) -> Option<&'a Candidate> {
    let title_lower = title.to_lowercase();

    let mut best: Option<(u32, &Candidate)> = None;
    for candidate in candidates.iter().filter(|c| has_field(c)) {
        let name_lower = candidate.name.to_lowercase();
        let mut score = 0;
        if name_lower == title_lower {
            score += 100;
        } else if name_lower.contains(&title_lower) {
            score += 50;
        }
        if let (Some(wanted), Some(have)) = (year, candidate.year.as_deref()) {
            if wanted == have {
                score += 100;
            }
        }
        if best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, c)| c)
}
