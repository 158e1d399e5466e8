use super::base::{ImageKey, StorageBackend, StorageResult, StoredImage};
use async_trait::async_trait;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
}

impl DiskStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> StorageResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;

        let storage = Self { base_path };
        let removed = storage.remove_partial_files()?;
        if removed > 0 {
            info!(
                "Removed {} unfinished download(s) under {}",
                removed,
                storage.base_path.display()
            );
        }
        Ok(storage)
    }

    /// Deletes `.*.part` files left by a write that never reached its rename.
    fn remove_partial_files(&self) -> StorageResult<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            for file in std::fs::read_dir(entry.path())? {
                let file = file?;
                let name = file.file_name();
                let name = name.to_string_lossy();
                if name.starts_with('.') && name.ends_with(".part") && file.file_type()?.is_file() {
                    std::fs::remove_file(file.path())?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, key: &ImageKey) -> StorageResult<PathBuf> {
        key.validate()?;
        Ok(self.base_path.join(&key.subfolder).join(&key.file_name))
    }
}

#[async_trait]
impl StorageBackend for DiskStorage {
    async fn contains(&self, key: &ImageKey) -> StorageResult<bool> {
        let path = self.path_for(key)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temp file in the target directory and renames it
    /// into place, so the final name only ever holds a complete image.
    async fn store(&self, key: &ImageKey, data: &[u8]) -> StorageResult<StoredImage> {
        let final_path = self.path_for(key)?;
        let dir = self.base_path.join(&key.subfolder);
        fs::create_dir_all(&dir).await?;

        let temp_path = dir.join(format!(".{}.{}.part", key.file_name, Uuid::now_v7()));
        debug!("Writing {} bytes to {}", data.len(), temp_path.display());

        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredImage {
            location: final_path,
            bytes: data.len(),
        })
    }
}
