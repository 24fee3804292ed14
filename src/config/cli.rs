use crate::core::Storage;
use crate::domain::model::StoredObject;
use crate::utils::error::{ExplainerError, Result};
use std::path::{Path, PathBuf};

/// Filesystem stand-in for object storage: `<base>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        Path::new(&self.base_path).join(bucket).join(key)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let full_path = self.object_path(bucket, key);
        tokio::fs::read(&full_path)
            .await
            .map_err(|e| ExplainerError::StorageError {
                message: format!("cannot read {}: {}", full_path.display(), e),
            })
    }

    async fn write_file(&self, bucket: &str, key: &str, data: &[u8]) -> Result<StoredObject> {
        let full_path = self.object_path(bucket, key);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, data).await?;

        let absolute = std::path::absolute(&full_path).unwrap_or(full_path);
        Ok(StoredObject {
            uri: format!("{}/{}", bucket, key),
            public_url: format!("file://{}", absolute.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_object() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let stored = storage
            .write_file("3final3", "AIF_final.mp4", b"video")
            .await
            .unwrap();

        assert_eq!(stored.uri, "3final3/AIF_final.mp4");
        assert!(stored.public_url.starts_with("file://"));
        assert!(stored.public_url.ends_with("3final3/AIF_final.mp4"));
        assert_eq!(
            storage.read_file("3final3", "AIF_final.mp4").await.unwrap(),
            b"video"
        );
    }

    #[tokio::test]
    async fn test_missing_object_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let result = storage.read_file("3description3", "AIF_DESCRIPTION.mp4").await;
        assert!(matches!(result, Err(ExplainerError::StorageError { .. })));
    }
}
