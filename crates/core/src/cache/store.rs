//! Filesystem-backed cache store implementation.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::parser::extract_year;

use super::types::{CacheKey, MetadataRecord};
use super::CacheError;

/// Bounded worker count for the cache-clear fan-out.
pub const CLEAR_WORKERS: usize = 8;

/// Disk cache for poster images and synopsis/metadata records.
///
/// Layout under the cache root:
/// - `posters/<key>.jpg`
/// - `synopsis/<key>.txt` and `synopsis/<key>_meta.txt`
///
/// Directories are created on first write. Reads treat any I/O or decode
/// failure as a miss.
pub struct CacheStore {
    posters_dir: PathBuf,
    synopsis_dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `cache_root`. No I/O happens here.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        let root = cache_root.into();
        Self {
            posters_dir: root.join("posters"),
            synopsis_dir: root.join("synopsis"),
        }
    }

    /// Read cached poster bytes for an exact key.
    pub async fn get_poster(&self, key: &CacheKey) -> Option<Vec<u8>> {
        fs::read(self.posters_dir.join(key.poster_file())).await.ok()
    }

    /// Persist poster bytes under a key, creating directories as needed.
    pub async fn put_poster(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        ensure_dir(&self.posters_dir).await?;
        let path = self.posters_dir.join(key.poster_file());
        fs::write(&path, bytes)
            .await
            .map_err(|source| CacheError::WriteFailed { path: path.clone(), source })?;
        debug!("cached poster at {}", path.display());
        Ok(())
    }

    /// Read a cached metadata record for an exact key.
    ///
    /// Both the synopsis file and a well-formed metadata line must be
    /// present; anything else is a miss so the caller refetches.
    pub async fn get_metadata(&self, key: &CacheKey) -> Option<MetadataRecord> {
        let synopsis = fs::read_to_string(self.synopsis_dir.join(key.synopsis_file()))
            .await
            .ok()?;
        let meta_line = fs::read_to_string(self.synopsis_dir.join(key.meta_file()))
            .await
            .ok()?;
        MetadataRecord::decode_meta_line(&meta_line, synopsis)
    }

    /// Persist a metadata record under a key, creating directories as needed.
    pub async fn put_metadata(
        &self,
        key: &CacheKey,
        record: &MetadataRecord,
    ) -> Result<(), CacheError> {
        ensure_dir(&self.synopsis_dir).await?;
        let synopsis_path = self.synopsis_dir.join(key.synopsis_file());
        fs::write(&synopsis_path, record.synopsis.as_bytes())
            .await
            .map_err(|source| CacheError::WriteFailed {
                path: synopsis_path,
                source,
            })?;
        let meta_path = self.synopsis_dir.join(key.meta_file());
        fs::write(&meta_path, record.encode_meta_line().as_bytes())
            .await
            .map_err(|source| CacheError::WriteFailed {
                path: meta_path,
                source,
            })?;
        Ok(())
    }

    /// Find a cached poster whose title prefix matches, preferring the
    /// entry whose embedded year is closest to the requested one.
    ///
    /// With no known year the first matching entry (in sorted directory
    /// order, for a stable tie-break) wins. Returns `None` when nothing in
    /// the poster cache matches.
    pub async fn closest_poster(&self, title: &str, year: Option<&str>) -> Option<Vec<u8>> {
        let wanted_year: Option<i32> = year.and_then(|y| y.parse().ok());
        let prefix = title.to_lowercase();

        let mut best: Option<(i32, PathBuf)> = None;
        for file_name in sorted_file_names(&self.posters_dir).await {
            let stem = file_name.strip_suffix(".jpg").unwrap_or(&file_name);
            let decoded = urlencoding::decode(stem)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| stem.to_string());
            if !decoded.to_lowercase().starts_with(&prefix) {
                continue;
            }
            let path = self.posters_dir.join(&file_name);
            match wanted_year {
                Some(wanted) => {
                    let Some(embedded) = extract_year(&decoded).and_then(|y| y.parse::<i32>().ok())
                    else {
                        continue;
                    };
                    let diff = (embedded - wanted).abs();
                    if best.as_ref().map(|(d, _)| diff < *d).unwrap_or(true) {
                        best = Some((diff, path));
                    }
                }
                None => {
                    best = Some((0, path));
                    break;
                }
            }
        }

        let (_, path) = best?;
        fs::read(&path).await.ok()
    }

    /// Delete every cached poster and synopsis/metadata file.
    ///
    /// Deletions fan out across up to [`CLEAR_WORKERS`] concurrent workers
    /// with no ordering guarantee. Individual failures are logged and
    /// skipped; the returned count covers successful removals and the
    /// future resolves only after every deletion has been attempted.
    pub async fn clear_all(&self) -> usize {
        let mut files = Vec::new();
        for dir in [&self.posters_dir, &self.synopsis_dir] {
            let Ok(mut entries) = fs::read_dir(dir).await else {
                continue;
            };
            while let Ok(Some(entry)) = entries.next_entry().await {
                files.push(entry.path());
            }
        }

        stream::iter(files)
            .map(|path| async move {
                match fs::remove_file(&path).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("failed to delete cache file {}: {}", path.display(), e);
                        false
                    }
                }
            })
            .buffer_unordered(CLEAR_WORKERS)
            .filter(|removed| futures::future::ready(*removed))
            .count()
            .await
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), CacheError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| CacheError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source,
        })
}

/// File names (not directories) in `dir`, sorted for stable iteration.
/// A missing or unreadable directory yields an empty list.
async fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut entries) = fs::read_dir(dir).await else {
        return names;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        match entry.file_type().await {
            Ok(ft) if ft.is_file() => names.push(entry.file_name().to_string_lossy().into_owned()),
            _ => {}
        }
    }
    names.sort();
    names
}
