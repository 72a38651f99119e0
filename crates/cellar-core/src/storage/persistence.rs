//! JSON store persistence
//!
//! Saves and loads the whole list of cellars as one JSON array. Uses atomic
//! writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/cellar/cellars.json` (configurable via
//! `Config`)

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::Cellar;
use crate::registry::CellarRegistry;

/// Persistence layer for the cellar store file
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a persistence handler for the store file of `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cellars_path())
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the store file with `cellars`
    pub fn save(&self, cellars: &[Cellar]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(cellars)?;
        atomic_write(&self.path, &bytes)
    }

    /// Load cellars from disk
    ///
    /// Returns `None` if the file doesn't exist.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self) -> StorageResult<Option<Vec<Cellar>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(|source| StorageError::ReadError {
            path: self.path.clone(),
            source,
        })?;

        let cellars: Vec<Cellar> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
                path: self.path.clone(),
                details: e.to_string(),
            })?;

        let cellars = cellars
            .into_iter()
            .map(|mut cellar| {
                cellar.items = cellar.items.into_iter().map(|item| item.normalized()).collect();
                cellar
            })
            .collect();

        Ok(Some(cellars))
    }

    /// Load the registry, falling back to one default cellar
    ///
    /// A missing, unreadable or malformed file is ignored as a whole.
    pub fn load_registry(&self) -> CellarRegistry {
        match self.load() {
            Ok(Some(cellars)) => CellarRegistry::from_cellars(cellars),
            Ok(None) => CellarRegistry::default(),
            Err(e) => {
                warn!(
                    hint = e.recovery_suggestion().unwrap_or_default(),
                    "Ignoring store file: {}", e
                );
                CellarRegistry::default()
            }
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
