//! Domain-level error types for bookmark-manager.
//!
//! All errors are typed with `thiserror`; the HTTP layer maps each variant
//! to a status code and the CLI prints the message.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown id on update or delete.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation is never allowed (e.g. deleting the default folder).
    #[error("{message}")]
    InvalidOperation { message: String },

    /// Import payload lacks the `folders` or `bookmarks` sequence.
    #[error("Invalid import data format: {message}")]
    MalformedImport { message: String },

    /// Import strategy is neither `merge` nor `replace`.
    #[error("Unknown import strategy: {value}. Use: merge, replace")]
    UnknownStrategy { value: String },

    /// Request body or arguments failed validation.
    #[error("{message}")]
    Validation { message: String },

    /// Reading or writing the persistence file failed.
    #[error("Storage error at {path}: {message}")]
    StorageIo {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Unexpected runtime failure (e.g. a worker task panicked).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a not-found error for a bookmark.
    pub fn bookmark_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Bookmark",
            id: id.into(),
        }
    }

    /// Create a not-found error for a folder.
    pub fn folder_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Folder",
            id: id.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a malformed-import error.
    pub fn malformed_import(message: impl Into<String>) -> Self {
        Self::MalformedImport {
            message: message.into(),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a storage error with context.
    pub fn storage(path: impl Into<PathBuf>, message: impl Into<String>, err: std::io::Error) -> Self {
        Self::StorageIo {
            path: path.into(),
            message: message.into(),
            source: Some(err),
        }
    }

    /// Whether the error was caused by the caller rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InvalidOperation { .. }
                | Self::MalformedImport { .. }
                | Self::UnknownStrategy { .. }
                | Self::Validation { .. }
        )
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
