//! Domain layer - core types and record operations.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (files, network, etc.).

pub mod config;
pub mod dataset;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use models::{
    Bookmark, BookmarkPatch, Dataset, ExportEnvelope, Folder, FolderPatch, ImportEnvelope,
    ImportPayload, ImportStrategy, NewBookmark, NewFolder, Timestamp, DEFAULT_FOLDER_ID,
};
