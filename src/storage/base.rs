use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Location of one image: a per-product subfolder and a timestamped file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub subfolder: String,
    pub file_name: String,
}

impl ImageKey {
    pub fn new(subfolder: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            subfolder: subfolder.into(),
            file_name: file_name.into(),
        }
    }

    /// Both parts must be single, non-traversing path components.
    pub fn validate(&self) -> StorageResult<()> {
        for part in [&self.subfolder, &self.file_name] {
            if part.is_empty()
                || part == "."
                || part == ".."
                || part.contains('/')
                || part.contains('\\')
            {
                return Err(StorageError::InvalidKey(format!(
                    "{}/{}",
                    self.subfolder, self.file_name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub location: PathBuf,
    pub bytes: usize,
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn contains(&self, key: &ImageKey) -> StorageResult<bool>;

    async fn store(&self, key: &ImageKey, data: &[u8]) -> StorageResult<StoredImage>;
}
