//! Permanent, entity-scoped attachment store.
//!
//! Promoted files live under `<root>/<entityId>/<category>/` and are only
//! ever removed wholesale with the entity's folder.

use std::path::{Path, PathBuf};

use tokio::fs;

use mediadesk_core::MediaCategory;

use crate::error::{StorageError, StorageResult};
use crate::staging::{normalize_relative, validate_relative};

/// Root directory for promoted attachments.
#[derive(Clone)]
pub struct PermanentStore {
    root: PathBuf,
    public_base: String,
}

impl PermanentStore {
    /// Create the store, ensuring the root directory exists.
    ///
    /// # Arguments
    /// * `root` - Root directory for promoted files (e.g., "uploads")
    /// * `public_base` - URL path prefix files are served under (e.g., "/uploads")
    pub async fn new(root: impl Into<PathBuf>, public_base: String) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(PermanentStore { root, public_base })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_category_dir(&self, entity_id: &str, category: MediaCategory) -> StorageResult<PathBuf> {
        let entity_id = normalize_relative(entity_id);
        validate_relative(entity_id)?;
        Ok(self.root.join(entity_id).join(category.as_str()))
    }

    /// Public-facing relative path for a promoted file.
    pub fn public_path(&self, entity_id: &str, category: MediaCategory, basename: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.public_base.trim_end_matches('/'),
            entity_id,
            category,
            basename
        )
    }

    /// Move a staged file into `<root>/<entityId>/<category>/` with an
    /// atomic rename. Returns the destination path.
    pub async fn accept(
        &self,
        src: &Path,
        entity_id: &str,
        category: MediaCategory,
    ) -> StorageResult<PathBuf> {
        let basename = src
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath("Source path has no filename".to_string()))?;

        let dest_dir = self.entity_category_dir(entity_id, category)?;
        fs::create_dir_all(&dest_dir).await?;

        let dest = dest_dir.join(basename);
        let start = std::time::Instant::now();

        fs::rename(src, &dest).await.map_err(|e| {
            StorageError::MoveFailed(format!(
                "Failed to move {} to {}: {}",
                src.display(),
                dest.display(),
                e
            ))
        })?;

        tracing::info!(
            from = %src.display(),
            to = %dest.display(),
            entity_id = %entity_id,
            category = %category,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Attachment promoted"
        );

        Ok(dest)
    }

    /// Recursively remove an entity's whole attachment tree. A missing tree
    /// is treated as already removed.
    pub async fn remove_entity_tree(&self, entity_id: &str) -> StorageResult<()> {
        let entity_id_norm = normalize_relative(entity_id);
        validate_relative(entity_id_norm)?;
        let dir = self.root.join(entity_id_norm);

        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::info!(dir = %dir.display(), entity_id = %entity_id, "Entity attachment tree removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove {}: {}",
                dir.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_accept_moves_file_into_entity_tree() {
        let dir = tempdir().unwrap();
        let store = PermanentStore::new(dir.path().join("uploads"), "/uploads".to_string())
            .await
            .unwrap();

        let src = dir.path().join("staged.jpg");
        std::fs::write(&src, b"payload").unwrap();

        let dest = store
            .accept(&src, "42", MediaCategory::Image)
            .await
            .unwrap();

        assert_eq!(dest, dir.path().join("uploads/42/image/staged.jpg"));
        assert!(!src.exists());
        assert_eq!(std::fs::read(dest).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_accept_missing_source_fails() {
        let dir = tempdir().unwrap();
        let store = PermanentStore::new(dir.path().join("uploads"), "/uploads".to_string())
            .await
            .unwrap();

        let src = dir.path().join("does-not-exist.bin");
        let result = store.accept(&src, "42", MediaCategory::File).await;
        assert!(matches!(result, Err(StorageError::MoveFailed(_))));
    }

    #[tokio::test]
    async fn test_public_path_format() {
        let dir = tempdir().unwrap();
        let store = PermanentStore::new(dir.path(), "/uploads".to_string())
            .await
            .unwrap();

        assert_eq!(
            store.public_path("42", MediaCategory::Image, "a.jpeg"),
            "/uploads/42/image/a.jpeg"
        );
    }

    #[tokio::test]
    async fn test_remove_entity_tree() {
        let dir = tempdir().unwrap();
        let store = PermanentStore::new(dir.path().join("uploads"), "/uploads".to_string())
            .await
            .unwrap();

        let nested = dir.path().join("uploads/42/image");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("a.jpg"), b"x").unwrap();

        store.remove_entity_tree("42").await.unwrap();
        assert!(!dir.path().join("uploads/42").exists());

        // Second removal is a no-op
        assert!(store.remove_entity_tree("42").await.is_ok());
    }

    #[tokio::test]
    async fn test_entity_id_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = PermanentStore::new(dir.path().join("uploads"), "/uploads".to_string())
            .await
            .unwrap();

        let result = store.remove_entity_tree("../other").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }
}
