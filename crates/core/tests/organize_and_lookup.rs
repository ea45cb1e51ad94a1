//! End-to-end flow: organize a downloads directory, then index the
//! resulting library with a mock catalog backend.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::fs;

use mediaflix_core::catalog::MediaKind;
use mediaflix_core::testing::MockCatalogBackend;
use mediaflix_core::{
    CacheStore, Candidate, CatalogClient, Library, Organizer, OrganizerConfig,
};

async fn seed_download(temp: &TempDir, name: &str) {
    let downloads = temp.path().join("downloads");
    fs::create_dir_all(&downloads).await.unwrap();
    fs::write(downloads.join(name), name.as_bytes()).await.unwrap();
}

fn organizer_config(temp: &TempDir) -> OrganizerConfig {
    let mut config = OrganizerConfig::new(
        vec![temp.path().join("downloads")],
        temp.path().join("movies"),
        temp.path().join("series"),
    );
    config.retry_delay = Duration::from_millis(1);
    config
}

fn candidate(name: &str, year: &str, overview: &str) -> Candidate {
    Candidate {
        name: name.to_string(),
        year: Some(year.to_string()),
        overview: Some(overview.to_string()),
        poster_path: Some("/poster.jpg".to_string()),
        rating: Some(8.5),
        genre_ids: vec![18, 80],
    }
}

#[tokio::test]
async fn organize_then_scan_resolves_library_entries() {
    let temp = TempDir::new().unwrap();
    seed_download(&temp, "Show.S02E03.mkv").await;
    seed_download(&temp, "Movie.2020.mkv").await;
    seed_download(&temp, "notes.txt").await;

    let report = Organizer::new(organizer_config(&temp)).organize().await;
    assert_eq!(report.moved.len(), 2);
    assert_eq!(report.skipped, 1);
    assert!(report.failed.is_empty());

    assert!(temp
        .path()
        .join("series/Show/Season 2/Show.S02E03.mkv")
        .exists());
    assert!(temp.path().join("movies/Movie.2020.mkv").exists());

    let backend = MockCatalogBackend::new();
    backend
        .add_candidate(MediaKind::Movie, candidate("Movie", "2020", "A movie."))
        .await;
    backend
        .add_candidate(MediaKind::Series, candidate("Show", "2019", "A show."))
        .await;
    let backend = Arc::new(backend);

    let cache = Arc::new(CacheStore::new(temp.path().join("cache")));
    let catalog = Arc::new(CatalogClient::new(backend.clone(), cache));
    let library = Library::new(catalog);

    let movies = library.scan(&temp.path().join("movies")).await;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].file.search_title, "Movie");
    assert_eq!(movies[0].metadata.synopsis, "A movie.");
    assert_eq!(movies[0].metadata.genres, vec!["Drama", "Crime"]);

    let episodes = library.scan(&temp.path().join("series")).await;
    assert_eq!(episodes.len(), 1);
    assert!(episodes[0].file.is_episode());
    assert_eq!(episodes[0].metadata.synopsis, "A show.");

    // Second scan is served from the cache.
    let searches_after_first = backend.search_count().await;
    library.scan(&temp.path().join("movies")).await;
    assert_eq!(backend.search_count().await, searches_after_first);
}

#[tokio::test]
async fn poster_flow_persists_to_cache() {
    let temp = TempDir::new().unwrap();

    let backend = MockCatalogBackend::new();
    backend
        .add_candidate(MediaKind::Movie, candidate("Movie", "2020", "A movie."))
        .await;
    backend.add_poster("/poster.jpg", b"image".to_vec()).await;
    let backend = Arc::new(backend);

    let cache_root = temp.path().join("cache");
    let cache = Arc::new(CacheStore::new(&cache_root));
    let catalog = CatalogClient::new(backend.clone(), cache.clone());

    let bytes = catalog
        .find_poster("Movie", Some("2020"), MediaKind::Movie)
        .await
        .unwrap();
    assert_eq!(bytes, b"image");
    assert!(poster_count(&cache_root.join("posters")) == 1);

    // Cached now: clearing removes poster plus synopsis/meta pair.
    catalog
        .find_metadata("Movie", Some("2020"), MediaKind::Movie)
        .await;
    assert_eq!(cache.clear_all().await, 3);
}

fn poster_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
