pub mod base;
pub mod disk;

pub use base::{ImageKey, StorageBackend, StorageError, StorageResult, StoredImage};
pub use disk::DiskStorage;
