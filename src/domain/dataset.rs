//! Record operations over an in-memory `Dataset`.
//!
//! Create stamps a fresh id and timestamp pair, update overwrites fields and
//! refreshes `modifiedAt`, folder removal cascades bookmarks to the default
//! folder. Persistence is the caller's job.

use uuid::Uuid;

use super::error::{AppError, Result};
use super::models::{
    Bookmark, BookmarkPatch, Dataset, Folder, FolderPatch, NewBookmark, NewFolder, Timestamp,
    DEFAULT_FOLDER_ID,
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Dataset {
    /// Whether `id` names an existing folder or the default folder.
    #[must_use]
    pub fn folder_exists(&self, id: &str) -> bool {
        id == DEFAULT_FOLDER_ID || self.folders.iter().any(|f| f.id == id)
    }

    /// Bookmarks whose `folderId` is `folder_id`, in stored order.
    pub fn bookmarks_in<'a>(&'a self, folder_id: &'a str) -> impl Iterator<Item = &'a Bookmark> {
        self.bookmarks.iter().filter(move |b| b.folder_id == folder_id)
    }

    fn ensure_folder(&self, id: &str) -> Result<()> {
        if self.folder_exists(id) {
            Ok(())
        } else {
            Err(AppError::validation(format!("Unknown folder: {id}")))
        }
    }

    /// Create a bookmark at the end of its folder.
    ///
    /// # Errors
    /// Returns `Validation` for an empty url or an unknown folder.
    pub fn add_bookmark(&mut self, input: NewBookmark) -> Result<Bookmark> {
        let url = input.url.trim();
        if url.is_empty() {
            return Err(AppError::validation("url is required"));
        }

        let folder_id = input
            .folder_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_FOLDER_ID.to_string());
        self.ensure_folder(&folder_id)?;

        let now = Timestamp::now();
        let order = i64::try_from(self.bookmarks_in(&folder_id).count()).unwrap_or(i64::MAX);
        let bookmark = Bookmark {
            id: new_id(),
            title: input.title,
            url: url.to_string(),
            folder_id,
            icon: input.icon.filter(|icon| !icon.is_empty()),
            order,
            created_at: Some(now.clone()),
            modified_at: Some(now),
        };

        self.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    /// Apply a partial update to a bookmark.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id, `Validation` for an empty url or
    /// unknown target folder.
    pub fn update_bookmark(&mut self, id: &str, patch: BookmarkPatch) -> Result<Bookmark> {
        if let Some(folder_id) = &patch.folder_id {
            self.ensure_folder(folder_id)?;
        }
        if patch.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(AppError::validation("url must not be empty"));
        }

        let bookmark = self
            .bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::bookmark_not_found(id))?;

        if let Some(title) = patch.title {
            bookmark.title = title;
        }
        if let Some(url) = patch.url {
            bookmark.url = url.trim().to_string();
        }
        if let Some(folder_id) = patch.folder_id {
            bookmark.folder_id = folder_id;
        }
        if let Some(icon) = patch.icon {
            bookmark.icon = Some(icon).filter(|i| !i.is_empty());
        }
        if let Some(order) = patch.order {
            bookmark.order = order;
        }
        bookmark.modified_at = Some(Timestamp::now());

        Ok(bookmark.clone())
    }

    /// Remove a bookmark, returning it.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn remove_bookmark(&mut self, id: &str) -> Result<Bookmark> {
        let index = self
            .bookmarks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| AppError::bookmark_not_found(id))?;
        Ok(self.bookmarks.remove(index))
    }

    /// Create a folder at the end of the folder list.
    ///
    /// # Errors
    /// Returns `Validation` for an empty name.
    pub fn add_folder(&mut self, input: NewFolder) -> Result<Folder> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let now = Timestamp::now();
        let folder = Folder {
            id: new_id(),
            name: name.to_string(),
            order: i64::try_from(self.folders.len()).unwrap_or(i64::MAX),
            created_at: Some(now.clone()),
            modified_at: Some(now),
        };

        self.folders.push(folder.clone());
        Ok(folder)
    }

    /// Apply a partial update to a folder.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id, `Validation` for an empty name.
    pub fn update_folder(&mut self, id: &str, patch: FolderPatch) -> Result<Folder> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("name must not be empty"));
        }

        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::folder_not_found(id))?;

        if let Some(name) = patch.name {
            folder.name = name.trim().to_string();
        }
        if let Some(order) = patch.order {
            folder.order = order;
        }
        folder.modified_at = Some(Timestamp::now());

        Ok(folder.clone())
    }

    /// Remove a folder and move its bookmarks to the default folder.
    ///
    /// Returns how many bookmarks were reassigned.
    ///
    /// # Errors
    /// Returns `InvalidOperation` for the default folder (whether or not it
    /// is present) and `NotFound` for an unknown id.
    pub fn remove_folder(&mut self, id: &str) -> Result<usize> {
        if id == DEFAULT_FOLDER_ID {
            return Err(AppError::InvalidOperation {
                message: "Cannot delete the default folder".to_string(),
            });
        }

        let index = self
            .folders
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| AppError::folder_not_found(id))?;
        self.folders.remove(index);

        let mut moved = 0;
        for bookmark in self.bookmarks.iter_mut().filter(|b| b.folder_id == id) {
            bookmark.folder_id = DEFAULT_FOLDER_ID.to_string();
            moved += 1;
        }

        Ok(moved)
    }
}
