//! Moves downloaded media files into the Movies/Series library layout.
//!
//! Each file is handled independently: one failed move is logged and
//! counted, never aborting the rest of the batch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::parser::{extract_series_info, is_media_file};

/// Organizer configuration.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Source directories scanned for downloaded media files.
    pub downloads_dirs: Vec<PathBuf>,
    /// Destination for movie files.
    pub movies_dir: PathBuf,
    /// Destination root for series files.
    pub series_dir: PathBuf,
    /// Total move attempts on a permission failure.
    pub retry_attempts: u32,
    /// Delay between retry attempts.
    pub retry_delay: Duration,
}

impl OrganizerConfig {
    pub fn new(
        downloads_dirs: Vec<PathBuf>,
        movies_dir: impl Into<PathBuf>,
        series_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloads_dirs,
            movies_dir: movies_dir.into(),
            series_dir: series_dir.into(),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Errors that can occur when moving a single file.
#[derive(Debug, Error)]
pub enum OrganizerError {
    /// Source file disappeared before or during the move.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Failed to create the destination directory.
    #[error("Failed to create destination directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Move failed after all retry attempts.
    #[error("Failed to move {from} to {to}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of one organize run.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Successfully moved files.
    pub moved: Vec<MovedFile>,
    /// Entries skipped (subdirectories, non-media files).
    pub skipped: usize,
    /// Files whose move failed after retries.
    pub failed: Vec<PathBuf>,
}

/// Sorts downloaded files into the Movies/Series layout.
pub struct Organizer {
    config: OrganizerConfig,
}

impl Organizer {
    pub fn new(config: OrganizerConfig) -> Self {
        Self { config }
    }

    /// Process every configured downloads directory once.
    ///
    /// Only top-level entries are considered; subdirectories are skipped,
    /// not recursed into. Files with a season/episode token go under
    /// `series/<name>/<season>/`, everything else goes to the movies
    /// directory under its original name.
    pub async fn organize(&self) -> OrganizeReport {
        let mut report = OrganizeReport::default();

        for dir in &self.config.downloads_dirs {
            let mut entries = match fs::read_dir(dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("cannot read downloads directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
                if is_dir || !is_media_file(&path) {
                    report.skipped += 1;
                    continue;
                }

                let file_name = match path.file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    None => {
                        report.skipped += 1;
                        continue;
                    }
                };
                let dest_dir = self.destination_for(&file_name);

                match self.move_file(&path, &dest_dir, &file_name).await {
                    Ok(destination) => {
                        info!("moved {} to {}", path.display(), destination.display());
                        report.moved.push(MovedFile {
                            from: path,
                            to: destination,
                        });
                    }
                    Err(e) => {
                        warn!("failed to move {}: {}", path.display(), e);
                        report.failed.push(path);
                    }
                }
            }
        }

        info!(
            "organize finished: {} moved, {} skipped, {} failed",
            report.moved.len(),
            report.skipped,
            report.failed.len()
        );
        report
    }

    /// Destination directory for one file name.
    fn destination_for(&self, file_name: &str) -> PathBuf {
        match extract_series_info(file_name) {
            Some(info) => self
                .config
                .series_dir
                .join(&info.name)
                .join(info.season_label()),
            None => self.config.movies_dir.clone(),
        }
    }

    /// Move one file into `dest_dir` under a collision-free name.
    ///
    /// Retries only on permission failures, up to the configured attempt
    /// count with a fixed delay in between. A missing source aborts
    /// immediately, as does any other error.
    pub async fn move_file(
        &self,
        source: &Path,
        dest_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, OrganizerError> {
        fs::create_dir_all(dest_dir)
            .await
            .map_err(|source| OrganizerError::DirectoryCreationFailed {
                path: dest_dir.to_path_buf(),
                source,
            })?;

        let mut attempt = 1;
        loop {
            // Recomputed per attempt in case the directory changed while
            // we were waiting.
            let destination = unique_destination(dest_dir, file_name).await;

            match move_across(source, &destination).await {
                Ok(()) => return Ok(destination),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(OrganizerError::SourceNotFound {
                        path: source.to_path_buf(),
                    });
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::PermissionDenied
                        && attempt < self.config.retry_attempts =>
                {
                    debug!(
                        "move of {} denied (attempt {}), retrying",
                        source.display(),
                        attempt
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(OrganizerError::MoveFailed {
                        from: source.to_path_buf(),
                        to: destination,
                        source: e,
                    });
                }
            }
        }
    }
}

/// Rename, falling back to copy + remove for cross-device moves.
async fn move_across(source: &Path, destination: &Path) -> Result<(), std::io::Error> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Cross-filesystem moves fail with EXDEV (18 on Linux).
            if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                fs::copy(source, destination).await?;
                fs::remove_file(source).await
            } else {
                Err(e)
            }
        }
    }
}

/// First free name in `dest_dir`, appending `_1`, `_2`, ... before the
/// extension until nothing occupies it.
async fn unique_destination(dest_dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dest_dir.join(file_name);
    if !fs::try_exists(&candidate).await.unwrap_or(false) {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file_name, None),
    };

    let mut counter = 1;
    loop {
        let numbered = match ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = dest_dir.join(numbered);
        if !fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        counter += 1;
    }
}
