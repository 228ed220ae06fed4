//! Bookmark service: the use cases behind the CLI and the REST API.
//!
//! Every call reads the whole dataset from the store, works on that copy and
//! writes the whole dataset back. Nothing is written when an operation fails.

use std::sync::Arc;

use crate::domain::{
    Bookmark, BookmarkPatch, Dataset, ExportEnvelope, Folder, FolderPatch, ImportEnvelope,
    ImportStrategy, NewBookmark, NewFolder, Result,
};
use crate::infrastructure::DatasetStore;

use super::reconcile::{reconcile_with_report, ReconcileReport};
use super::search::search_bookmarks;

/// Service over a dataset store.
#[derive(Clone)]
pub struct BookmarkService {
    store: Arc<dyn DatasetStore>,
}

impl BookmarkService {
    /// Create a service backed by `store`.
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self { store }
    }

    /// Load, apply `op`, and save only if `op` succeeded.
    fn mutate<T>(&self, op: impl FnOnce(&mut Dataset) -> Result<T>) -> Result<T> {
        let mut dataset = self.store.load()?;
        let value = op(&mut dataset)?;
        self.store.save(&dataset)?;
        Ok(value)
    }

    /// The whole dataset.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn dataset(&self) -> Result<Dataset> {
        self.store.load()
    }

    /// All folders.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn folders(&self) -> Result<Vec<Folder>> {
        Ok(self.store.load()?.folders)
    }

    /// Create a bookmark.
    ///
    /// # Errors
    /// Returns `Validation` for bad input or a storage error.
    pub fn create_bookmark(&self, input: NewBookmark) -> Result<Bookmark> {
        let bookmark = self.mutate(|ds| ds.add_bookmark(input))?;
        tracing::info!(id = %bookmark.id, url = %bookmark.url, "Bookmark created");
        Ok(bookmark)
    }

    /// Update a bookmark.
    ///
    /// # Errors
    /// Returns `NotFound`, `Validation` or a storage error.
    pub fn update_bookmark(&self, id: &str, patch: BookmarkPatch) -> Result<Bookmark> {
        let bookmark = self.mutate(|ds| ds.update_bookmark(id, patch))?;
        tracing::info!(id, "Bookmark updated");
        Ok(bookmark)
    }

    /// Delete a bookmark.
    ///
    /// # Errors
    /// Returns `NotFound` or a storage error.
    pub fn delete_bookmark(&self, id: &str) -> Result<Bookmark> {
        let bookmark = self.mutate(|ds| ds.remove_bookmark(id))?;
        tracing::info!(id, "Bookmark deleted");
        Ok(bookmark)
    }

    /// Create a folder.
    ///
    /// # Errors
    /// Returns `Validation` for bad input or a storage error.
    pub fn create_folder(&self, input: NewFolder) -> Result<Folder> {
        let folder = self.mutate(|ds| ds.add_folder(input))?;
        tracing::info!(id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Update a folder.
    ///
    /// # Errors
    /// Returns `NotFound`, `Validation` or a storage error.
    pub fn update_folder(&self, id: &str, patch: FolderPatch) -> Result<Folder> {
        let folder = self.mutate(|ds| ds.update_folder(id, patch))?;
        tracing::info!(id, "Folder updated");
        Ok(folder)
    }

    /// Delete a folder, moving its bookmarks to the default folder.
    ///
    /// # Errors
    /// Returns `InvalidOperation` for the default folder, `NotFound`, or a
    /// storage error.
    pub fn delete_folder(&self, id: &str) -> Result<usize> {
        let moved = self.mutate(|ds| ds.remove_folder(id))?;
        tracing::info!(id, reassigned = moved, "Folder deleted");
        Ok(moved)
    }

    /// Snapshot the dataset into an export envelope.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn export(&self) -> Result<ExportEnvelope> {
        Ok(ExportEnvelope::new(self.store.load()?))
    }

    /// Reconcile an import into the stored dataset.
    ///
    /// # Errors
    /// Returns `MalformedImport` for a bad envelope (nothing is written) or a
    /// storage error.
    pub fn import(
        &self,
        envelope: ImportEnvelope,
        strategy: ImportStrategy,
    ) -> Result<ReconcileReport> {
        let payload = envelope.into_payload()?;
        let current = self.store.load()?;
        let (next, report) = reconcile_with_report(&current, payload, strategy)?;
        self.store.save(&next)?;

        tracing::info!(
            %strategy,
            folders_added = report.folders_added,
            bookmarks_added = report.bookmarks_added,
            bookmarks_updated = report.bookmarks_updated,
            bookmarks_skipped = report.bookmarks_skipped,
            "Import completed"
        );

        Ok(report)
    }

    /// Search bookmarks by title, url or domain.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn search(&self, query: &str, folder: Option<&str>) -> Result<Vec<Bookmark>> {
        Ok(search_bookmarks(&self.store.load()?, query, folder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppError, DEFAULT_FOLDER_ID};
    use crate::infrastructure::MemoryStore;

    fn service() -> (BookmarkService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new(Dataset::seeded()));
        (BookmarkService::new(store.clone()), store)
    }

    fn new_bookmark(url: &str) -> NewBookmark {
        NewBookmark {
            title: "T".into(),
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_persists() {
        let (svc, store) = service();
        let bm = svc.create_bookmark(new_bookmark("https://a.com")).unwrap();

        let stored = store.snapshot();
        assert_eq!(stored.bookmarks, vec![bm]);
    }

    #[test]
    fn test_failed_operation_writes_nothing() {
        let (svc, store) = service();
        let before = store.snapshot();

        assert!(svc.delete_folder(DEFAULT_FOLDER_ID).is_err());
        assert!(svc.update_bookmark("missing", BookmarkPatch::default()).is_err());
        assert!(svc
            .import(ImportEnvelope::default(), ImportStrategy::Replace)
            .is_err());

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let store = Arc::new(MemoryStore::read_only(Dataset::seeded()));
        let svc = BookmarkService::new(store.clone());

        let err = svc.create_bookmark(new_bookmark("https://a.com")).unwrap_err();
        assert!(matches!(err, AppError::StorageIo { .. }));
        assert!(store.snapshot().bookmarks.is_empty());
    }

    #[test]
    fn test_delete_folder_cascades_in_store() {
        let (svc, store) = service();
        let folder = svc.create_folder(NewFolder { name: "Work".into() }).unwrap();
        svc.create_bookmark(NewBookmark {
            folder_id: Some(folder.id.clone()),
            ..new_bookmark("https://a.com")
        })
        .unwrap();

        assert_eq!(svc.delete_folder(&folder.id).unwrap(), 1);

        let stored = store.snapshot();
        assert_eq!(stored.folders.len(), 1);
        assert_eq!(stored.bookmarks[0].folder_id, DEFAULT_FOLDER_ID);
    }

    #[test]
    fn test_export_then_merge_import_is_noop() {
        let (svc, store) = service();
        svc.create_bookmark(new_bookmark("https://a.com")).unwrap();
        let before = store.snapshot();

        let envelope = svc.export().unwrap();
        assert_eq!(envelope.version, "1.0");

        let report = svc.import(envelope.into(), ImportStrategy::Merge).unwrap();
        assert_eq!(report.bookmarks_added, 0);
        assert_eq!(report.folders_added, 0);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_replace_import() {
        let (svc, store) = service();
        svc.create_bookmark(new_bookmark("https://a.com")).unwrap();

        let incoming = Dataset::default();
        svc.import(
            ExportEnvelope::new(incoming.clone()).into(),
            ImportStrategy::Replace,
        )
        .unwrap();

        assert_eq!(store.snapshot(), incoming);
    }
}
