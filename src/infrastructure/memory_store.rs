//! In-memory dataset store used by tests.

use std::sync::{Mutex, MutexGuard};

use crate::domain::{AppError, Dataset, Result};

use super::json_store::DatasetStore;

/// Dataset held in memory, optionally failing every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    dataset: Mutex<Dataset>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Store starting from `dataset`.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Mutex::new(dataset),
            fail_writes: false,
        }
    }

    /// Store whose `save` always fails.
    pub fn read_only(dataset: Dataset) -> Self {
        Self {
            dataset: Mutex::new(dataset),
            fail_writes: true,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dataset>> {
        self.dataset.lock().map_err(|_| AppError::Internal {
            message: "memory store lock poisoned".into(),
        })
    }

    /// Current stored dataset. Panics if the lock is poisoned.
    pub fn snapshot(&self) -> Dataset {
        self.load().expect("memory store lock poisoned")
    }
}

impl DatasetStore for MemoryStore {
    fn load(&self) -> Result<Dataset> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::storage(
                "memory",
                "Store is read-only",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        *self.lock()? = dataset.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let store = std::sync::Arc::new(MemoryStore::new(Dataset::seeded()));
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.dataset.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.load(), Err(AppError::Internal { .. })));
        assert!(matches!(
            store.save(&Dataset::default()),
            Err(AppError::Internal { .. })
        ));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let store = MemoryStore::read_only(Dataset::seeded());
        assert!(matches!(
            store.save(&Dataset::default()),
            Err(AppError::StorageIo { .. })
        ));
        assert_eq!(store.snapshot(), Dataset::seeded());
    }
}
