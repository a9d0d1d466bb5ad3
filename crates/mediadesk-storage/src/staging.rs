//! Staging area for in-flight downloads.
//!
//! Downloads land here under a per-category subdirectory and stay until a
//! business decision promotes or discards them. The reaper sweeps anything
//! that outlives the configured age.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::{Duration, SystemTime};

use tokio::fs;
use tokio::io::AsyncRead;

use mediadesk_core::MediaCategory;

use crate::error::{StorageError, StorageResult};

/// Strip leading path separators so the value can only resolve inside a root.
pub(crate) fn normalize_relative(path: &str) -> &str {
    path.trim_start_matches(['/', '\\'])
}

/// Reject values that could climb out of the root once joined.
pub(crate) fn validate_relative(path: &str) -> StorageResult<()> {
    if Path::new(path)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(StorageError::InvalidPath(
            "Path contains parent directory components".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of a single reaper sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub scanned: usize,
    pub deleted: usize,
    pub errors: usize,
}

/// Root directory for staged downloads.
#[derive(Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create the staging area, ensuring the root directory exists.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create staging directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(StagingArea { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category_dir(&self, category: MediaCategory) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Ensure the category subdirectory exists, creating it recursively.
    pub async fn ensure_category_dir(&self, category: MediaCategory) -> StorageResult<PathBuf> {
        let dir = self.category_dir(category);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Resolve a recorded relative path against the staging root.
    pub fn resolve(&self, relative: &str) -> StorageResult<PathBuf> {
        let relative = normalize_relative(relative);
        validate_relative(relative)?;
        Ok(self.root.join(relative))
    }

    /// Stream a payload into `<root>/<category>/<filename>`.
    ///
    /// The reader is piped to the file with `tokio::io::copy`, so memory use
    /// stays bounded by the copy buffer regardless of payload size. On write
    /// failure the partial file is removed before the error is returned.
    pub async fn store_stream(
        &self,
        category: MediaCategory,
        filename: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let dir = self.ensure_category_dir(category).await?;
        let path = dir.join(filename);
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = match tokio::io::copy(&mut reader, &mut file).await {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                if let Err(cleanup_err) = fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %cleanup_err,
                        "Failed to remove partial staged file"
                    );
                }
                return Err(StorageError::WriteFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            category = %category,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Staged download written"
        );

        Ok(bytes_copied)
    }

    /// Delete a staged file by its recorded relative path. Missing files are
    /// treated as already deleted.
    pub async fn remove_file(&self, relative: &str) -> StorageResult<()> {
        let path = self.resolve(relative)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Staged file deleted");
        Ok(())
    }

    /// Delete staged files older than `max_age` across the four category
    /// subdirectories. Per-file errors are logged and do not stop the sweep.
    pub async fn sweep_older_than(&self, max_age: Duration) -> SweepStats {
        let mut stats = SweepStats::default();
        let now = SystemTime::now();

        for category in MediaCategory::ALL {
            let dir = self.category_dir(category);
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Failed to read staging directory");
                    stats.errors += 1;
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(dir = %dir.display(), error = %e, "Failed to read staging entry");
                        stats.errors += 1;
                        break;
                    }
                };
                stats.scanned += 1;

                let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                    Ok(modified) => modified,
                    Err(e) => {
                        tracing::warn!(path = %entry.path().display(), error = %e, "Failed to stat staged file");
                        stats.errors += 1;
                        continue;
                    }
                };

                let age = now.duration_since(modified).unwrap_or_default();
                if age <= max_age {
                    continue;
                }

                match fs::remove_file(entry.path()).await {
                    Ok(()) => {
                        stats.deleted += 1;
                        tracing::info!(path = %entry.path().display(), "Reaped stale staged file");
                    }
                    Err(e) => {
                        stats.errors += 1;
                        tracing::warn!(path = %entry.path().display(), error = %e, "Failed to reap staged file");
                    }
                }
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use tempfile::tempdir;

    fn reader_from(data: &[u8]) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(std::io::Cursor::new(data.to_vec()))
    }

    #[tokio::test]
    async fn test_store_stream_writes_under_category() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path().join("temp")).await.unwrap();

        let written = staging
            .store_stream(MediaCategory::Image, "a.jpg", reader_from(b"image data"))
            .await
            .unwrap();

        assert_eq!(written, 10);
        let path = dir.path().join("temp/image/a.jpg");
        assert_eq!(std::fs::read(path).unwrap(), b"image data");
    }

    #[tokio::test]
    async fn test_resolve_strips_leading_separators() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        let resolved = staging.resolve("/image/a.jpg").unwrap();
        assert_eq!(resolved, dir.path().join("image/a.jpg"));

        let resolved = staging.resolve("\\image\\a.jpg").unwrap();
        assert!(resolved.starts_with(dir.path()));
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        let result = staging.resolve("../../../etc/passwd");
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = staging.resolve("image/../../passwd");
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        assert!(staging.remove_file("image/nonexistent.jpg").await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_old_files() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        staging
            .store_stream(MediaCategory::File, "fresh.bin", reader_from(b"fresh"))
            .await
            .unwrap();

        // Zero max age treats everything as stale
        let stats = staging.sweep_older_than(Duration::ZERO).await;
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.errors, 0);

        // Fresh file survives a generous threshold
        staging
            .store_stream(MediaCategory::File, "fresh2.bin", reader_from(b"fresh"))
            .await
            .unwrap();
        let stats = staging.sweep_older_than(Duration::from_secs(3600)).await;
        assert_eq!(stats.deleted, 0);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        staging
            .store_stream(MediaCategory::Video, "old.mp4", reader_from(b"video"))
            .await
            .unwrap();

        let first = staging.sweep_older_than(Duration::ZERO).await;
        assert_eq!(first.deleted, 1);

        let second = staging.sweep_older_than(Duration::ZERO).await;
        assert_eq!(second.deleted, 0);
        assert_eq!(second.errors, 0);
    }

    #[tokio::test]
    async fn test_sweep_skips_missing_category_dirs() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        // No category dirs created yet
        let stats = staging.sweep_older_than(Duration::ZERO).await;
        assert_eq!(stats, SweepStats::default());
    }
}
