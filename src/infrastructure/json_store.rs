//! JSON file persistence for the bookmark dataset.
//!
//! The whole dataset lives in one pretty-printed JSON document that is read
//! and written as a unit. There is no locking: the last full write wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::{AppError, Dataset, Result};

/// Whole-document storage for the dataset.
pub trait DatasetStore: Send + Sync {
    /// Read the full dataset.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read at all.
    fn load(&self) -> Result<Dataset>;

    /// Replace the full dataset.
    ///
    /// # Errors
    /// Returns `StorageIo` if the write fails; the change is then not durable.
    fn save(&self, dataset: &Dataset) -> Result<()>;
}

/// Dataset stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the data file, seeding it with the default folder if absent.
    ///
    /// # Errors
    /// Returns `StorageIo` if the directory or seed file cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::storage(parent, "Failed to create data directory", e))?;
        }

        if !path.exists() {
            store.save(&Dataset::seeded())?;
            tracing::info!(path = %path.display(), "Created data file");
        }

        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl DatasetStore for JsonFileStore {
    /// Unreadable or corrupt files degrade to an empty dataset.
    fn load(&self) -> Result<Dataset> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read data file");
                return Ok(Dataset::default());
            }
        };

        match serde_json::from_str(&content) {
            Ok(dataset) => Ok(dataset),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to parse data file");
                Ok(Dataset::default())
            }
        }
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        let content = serde_json::to_string_pretty(dataset).map_err(AppError::json_parse)?;

        // Each save gets its own temp file; concurrent writers never share one.
        let dir = self.dir();
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| AppError::storage(dir, "Failed to create temp file", e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| AppError::storage(tmp.path(), "Failed to write data file", e))?;
        tmp.persist(&self.path)
            .map_err(|e| AppError::storage(&self.path, "Failed to replace data file", e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            folders = dataset.folders.len(),
            bookmarks = dataset.bookmarks.len(),
            "Dataset saved"
        );

        Ok(())
    }
}
