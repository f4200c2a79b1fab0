use crate::error::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Layout of the data directory.
///
/// ```text
/// <root>/db/       SQLite database
/// <root>/uploads/  uploaded objects, one file per object id
/// ```
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of everything the backend writes.
    pub fn data_dir(&self) -> &Path {
        &self.root
    }

    pub fn db_dir(&self) -> PathBuf {
        self.root.join("db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Creates the data, db and uploads directories if they do not exist.
    pub async fn init(&self) -> Result<(), AppError> {
        for dir in [self.root.clone(), self.db_dir(), self.uploads_dir()] {
            if !fs::try_exists(&dir).await? {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir).await?;
            }
        }
        Ok(())
    }
}

/// Local object store where every object can be written exactly once.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    dir: PathBuf,
}

impl ObjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn object_file(&self, object_id: &str) -> Result<PathBuf, AppError> {
        let valid = !object_id.is_empty()
            && object_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(AppError::Validation(format!(
                "Invalid object id: {}",
                object_id
            )));
        }
        Ok(self.dir.join(object_id))
    }

    /// Stores `bytes` under `object_id`; a second write is a conflict.
    pub async fn write_once(&self, object_id: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.object_file(object_id)?;
        fs::create_dir_all(&self.dir).await?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AppError::Conflict(format!(
                    "Object {} has already been written",
                    object_id
                )));
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(bytes).await?;
        file.flush().await?;
        info!(object_id, size = bytes.len(), "Object stored");
        Ok(path)
    }

    pub async fn read(&self, object_id: &str) -> Result<Vec<u8>, AppError> {
        let path = self.object_file(object_id)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound(format!(
                "Object {} not found",
                object_id
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_layout() {
        let temp = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(temp.path().join("data"));

        paths.init().await.unwrap();

        assert!(paths.db_dir().is_dir());
        assert!(paths.uploads_dir().is_dir());
    }

    #[tokio::test]
    async fn test_write_once() {
        let temp = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(temp.path());

        store.write_once("abc-123", b"hello").await.unwrap();
        assert_eq!(store.read("abc-123").await.unwrap(), b"hello");

        let second = store.write_once("abc-123", b"again").await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.read("abc-123").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(temp.path());

        let result = store.write_once("../escape", b"x").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
