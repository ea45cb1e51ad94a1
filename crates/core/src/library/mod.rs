//! Library indexing: walks the organized media tree and resolves each
//! file to a [`LibraryEntry`] with catalog metadata attached.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::cache::MetadataRecord;
use crate::catalog::{CatalogClient, MediaKind};
use crate::parser::{is_media_file, MediaFileName};

/// Concurrent metadata lookups during a scan.
pub const SCAN_CONCURRENCY: usize = 4;

/// One indexed playable item with resolved metadata.
#[derive(Debug)]
pub struct LibraryEntry {
    /// Absolute path to the media file.
    pub path: PathBuf,
    /// Identity parsed from the file name.
    pub file: MediaFileName,
    /// Metadata resolved through the catalog client.
    pub metadata: MetadataRecord,
}

/// One series directory under the series root.
#[derive(Debug)]
pub struct SeriesEntry {
    /// Series name (the directory name).
    pub name: String,
    /// Path to the series directory.
    pub path: PathBuf,
    /// Number of media files anywhere under the directory.
    pub episode_count: usize,
    /// Metadata resolved for the series name.
    pub metadata: MetadataRecord,
}

/// Indexer over an organized media tree.
pub struct Library {
    catalog: Arc<CatalogClient>,
}

impl Library {
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Index every media file under `root`.
    ///
    /// Walk order is sorted by name at every level, so the result is
    /// stable for a fixed tree. Metadata lookups run up to
    /// [`SCAN_CONCURRENCY`] at a time while the output order stays the
    /// walk order.
    pub async fn scan(&self, root: &Path) -> Vec<LibraryEntry> {
        let files = walk_media_files(root.to_path_buf()).await;
        debug!("scanning {} media files under {}", files.len(), root.display());

        stream::iter(files)
            .map(|path| async move {
                let file = MediaFileName::parse(&path);
                let kind = if file.is_episode() {
                    MediaKind::Series
                } else {
                    MediaKind::Movie
                };
                let metadata = self
                    .catalog
                    .find_metadata(&file.search_title, file.year.as_deref(), kind)
                    .await;
                LibraryEntry {
                    path,
                    file,
                    metadata,
                }
            })
            .buffered(SCAN_CONCURRENCY)
            .collect()
            .await
    }

    /// List the series directories directly under `series_root`, sorted
    /// by name, with episode counts and resolved metadata.
    pub async fn series(&self, series_root: &Path) -> Vec<SeriesEntry> {
        let root = series_root.to_path_buf();
        let listed = match tokio::task::spawn_blocking(move || list_series_dirs(&root)).await {
            Ok(listed) => listed,
            Err(e) => {
                warn!("series listing task failed: {}", e);
                return Vec::new();
            }
        };

        let mut entries = Vec::with_capacity(listed.len());
        for (name, path, episode_count) in listed {
            let metadata = self
                .catalog
                .find_metadata(&name, None, MediaKind::Series)
                .await;
            entries.push(SeriesEntry {
                name,
                path,
                episode_count,
                metadata,
            });
        }
        entries
    }
}

/// Run the synchronous walk on the blocking pool so scans don't stall
/// the async workers.
async fn walk_media_files(root: PathBuf) -> Vec<PathBuf> {
    match tokio::task::spawn_blocking(move || collect_media_files(&root)).await {
        Ok(files) => files,
        Err(e) => {
            warn!("media walk task failed: {}", e);
            Vec::new()
        }
    }
}

/// List the series directories directly under `root`, sorted by name,
/// each with its media file count. Synchronous; callers run it on the
/// blocking pool.
fn list_series_dirs(root: &Path) -> Vec<(String, PathBuf, usize)> {
    let mut dirs: Vec<PathBuf> = match std::fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(e) => {
            warn!("cannot read series root {}: {}", root.display(), e);
            return Vec::new();
        }
    };
    dirs.sort();

    dirs.into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let episode_count = collect_media_files(&path).len();
            Some((name, path, episode_count))
        })
        .collect()
}

/// Recursively collect media files under `root`, sorted by name at every
/// level. Unreadable directories are skipped.
fn collect_media_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut children: Vec<PathBuf> = match std::fs::read_dir(root) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => return files,
    };
    children.sort();

    for path in children {
        if path.is_dir() {
            files.extend(collect_media_files(&path));
        } else if is_media_file(&path) {
            files.push(path);
        }
    }
    files
}
