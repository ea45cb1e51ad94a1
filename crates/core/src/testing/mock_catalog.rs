//! Mock catalog backend for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{Candidate, CatalogBackend, CatalogError, MediaKind};

/// A recorded backend query for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedQuery {
    Search {
        title: String,
        year: Option<String>,
        kind: MediaKind,
    },
    FetchPoster {
        poster_path: String,
    },
}

/// Mock implementation of the [`CatalogBackend`] trait.
///
/// Provides controllable behavior for testing:
/// - Seeded candidates per media kind, matched by name substring
/// - Seeded poster bytes per poster path
/// - Recorded queries for assertions
/// - One-shot failure injection
pub struct MockCatalogBackend {
    movies: Arc<RwLock<Vec<Candidate>>>,
    series: Arc<RwLock<Vec<Candidate>>>,
    posters: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    fail_next: Arc<RwLock<bool>>,
}

impl Default for MockCatalogBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogBackend {
    /// Create a new empty mock backend.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(Vec::new())),
            series: Arc::new(RwLock::new(Vec::new())),
            posters: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            fail_next: Arc::new(RwLock::new(false)),
        }
    }

    /// Seed a candidate for a media kind. Insertion order is preserved in
    /// search results.
    pub async fn add_candidate(&self, kind: MediaKind, candidate: Candidate) {
        match kind {
            MediaKind::Movie => self.movies.write().await.push(candidate),
            MediaKind::Series => self.series.write().await.push(candidate),
        }
    }

    /// Seed poster bytes behind a poster path.
    pub async fn add_poster(&self, poster_path: &str, bytes: Vec<u8>) {
        self.posters
            .write()
            .await
            .insert(poster_path.to_string(), bytes);
    }

    /// Make the next search call fail with an API error.
    pub async fn fail_next_search(&self) {
        *self.fail_next.write().await = true;
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Number of search queries performed.
    pub async fn search_count(&self) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedQuery::Search { .. }))
            .count()
    }

    async fn take_failure(&self) -> bool {
        std::mem::take(&mut *self.fail_next.write().await)
    }

    async fn record(&self, query: RecordedQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl CatalogBackend for MockCatalogBackend {
    async fn search(
        &self,
        title: &str,
        year: Option<&str>,
        kind: MediaKind,
    ) -> Result<Vec<Candidate>, CatalogError> {
        if self.take_failure().await {
            return Err(CatalogError::ApiError {
                status: 500,
                message: "injected failure".to_string(),
            });
        }

        self.record(RecordedQuery::Search {
            title: title.to_string(),
            year: year.map(str::to_string),
            kind,
        })
        .await;

        let pool = match kind {
            MediaKind::Movie => self.movies.read().await,
            MediaKind::Series => self.series.read().await,
        };
        let title_lower = title.to_lowercase();

        Ok(pool
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&title_lower))
            .cloned()
            .collect())
    }

    async fn fetch_poster(&self, poster_path: &str) -> Result<Vec<u8>, CatalogError> {
        self.record(RecordedQuery::FetchPoster {
            poster_path: poster_path.to_string(),
        })
        .await;

        self.posters
            .read()
            .await
            .get(poster_path)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("poster {} not seeded", poster_path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            year: None,
            overview: None,
            poster_path: None,
            rating: None,
            genre_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_search_matches_by_substring_and_kind() {
        let backend = MockCatalogBackend::new();
        backend
            .add_candidate(MediaKind::Movie, candidate("The Matrix"))
            .await;
        backend
            .add_candidate(MediaKind::Series, candidate("The Office"))
            .await;

        let results = backend.search("matrix", None, MediaKind::Movie).await.unwrap();
        assert_eq!(results.len(), 1);

        let results = backend.search("matrix", None, MediaKind::Series).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection_is_one_shot() {
        let backend = MockCatalogBackend::new();
        backend.fail_next_search().await;

        assert!(backend.search("x", None, MediaKind::Movie).await.is_err());
        assert!(backend.search("x", None, MediaKind::Movie).await.is_ok());
        // The failed call is not recorded.
        assert_eq!(backend.search_count().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_poster() {
        let backend = MockCatalogBackend::new();
        backend.add_poster("/p.jpg", b"bytes".to_vec()).await;

        assert_eq!(backend.fetch_poster("/p.jpg").await.unwrap(), b"bytes");
        assert!(backend.fetch_poster("/missing.jpg").await.is_err());
    }
}
