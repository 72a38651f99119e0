//! Photo resource management
//!
//! Items may carry a photo reference: either an external location (a path
//! or URI the user picked) or a managed copy owned by the store. The engine
//! never looks at photo bytes; it only asks a `PhotoStore` to make a managed
//! copy when a new external reference shows up and to release a managed copy
//! once no item points at it anymore.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

/// File/blob store holding managed photo copies
pub trait PhotoStore {
    /// Persist a managed copy of `source` for item `item_id`
    ///
    /// Returns the reference of the managed copy. References that are
    /// already managed are returned unchanged.
    fn persist(&self, item_id: Uuid, source: &str) -> StorageResult<String>;

    /// Delete a managed copy; references this store does not own are ignored
    fn release(&self, reference: &str) -> StorageResult<()>;

    /// Whether `reference` points at a copy owned by this store
    fn is_managed(&self, reference: &str) -> bool;
}

/// Photo store that keeps references as they are and never deletes anything
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmanagedPhotos;

impl PhotoStore for UnmanagedPhotos {
    fn persist(&self, _item_id: Uuid, source: &str) -> StorageResult<String> {
        Ok(source.to_string())
    }

    fn release(&self, _reference: &str) -> StorageResult<()> {
        Ok(())
    }

    fn is_managed(&self, _reference: &str) -> bool {
        false
    }
}

/// Managed copies stored as files in one directory
///
/// Copies are named `<item-id>_<millis>.<ext>`. Sources may be plain paths
/// or `file://` URIs; any other scheme is rejected.
#[derive(Debug, Clone)]
pub struct ManagedPhotoDir {
    dir: PathBuf,
}

impl ManagedPhotoDir {
    /// Create a store rooted at `dir` (created lazily on first copy)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the managed copies
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn local_source(source: &str) -> Option<PathBuf> {
        if let Some(path) = source.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        // Anything with a scheme other than file:// is not ours to read
        if source.contains("://") || source.starts_with("content:") {
            return None;
        }
        Some(PathBuf::from(source))
    }
}

impl PhotoStore for ManagedPhotoDir {
    fn persist(&self, item_id: Uuid, source: &str) -> StorageResult<String> {
        if self.is_managed(source) {
            return Ok(source.to_string());
        }

        let path = Self::local_source(source).ok_or_else(|| StorageError::UnsupportedPhotoSource {
            reference: source.to_string(),
        })?;
        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        fs::create_dir_all(&self.dir).map_err(|source| StorageError::CreateDirectory {
            path: self.dir.clone(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "jpg".to_string());
        let target = self.dir.join(format!(
            "{}_{}.{}",
            item_id,
            Utc::now().timestamp_millis(),
            extension
        ));

        fs::copy(&path, &target).map_err(|e| StorageError::from_io(e, target.clone()))?;
        Ok(target.to_string_lossy().into_owned())
    }

    fn release(&self, reference: &str) -> StorageResult<()> {
        if !self.is_managed(reference) {
            return Ok(());
        }
        let path = PathBuf::from(reference);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path.clone()))?;
        }
        Ok(())
    }

    fn is_managed(&self, reference: &str) -> bool {
        let path = Path::new(reference);
        path.parent() == Some(self.dir.as_path())
    }
}
