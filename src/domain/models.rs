//! Domain models for the bookmark dataset.
//!
//! The JSON shape of these types is the persisted file format and the wire
//! format of the REST API, so field names are camelCase.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Id of the folder that always exists and receives orphaned bookmarks.
pub const DEFAULT_FOLDER_ID: &str = "default";

/// Export format version written into every envelope.
pub const EXPORT_VERSION: &str = "1.0";

/// A creation or modification time as stored on disk.
///
/// Kept as the raw string so imported data round-trips unchanged; parsed
/// on demand when two records are compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current time as an RFC 3339 UTC string with millisecond precision.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Raw string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into an instant.
    ///
    /// Accepts RFC 3339, a naive date-time (treated as UTC) or a bare date
    /// (midnight UTC). Anything else is `None`.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Whether `self` is strictly later than `other`.
    ///
    /// False whenever either side fails to parse.
    #[must_use]
    pub fn is_later_than(&self, other: &Self) -> bool {
        match (self.instant(), other.instant()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_folder_id() -> String {
    DEFAULT_FOLDER_ID.to_string()
}

/// A named group of bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Position among folders.
    #[serde(default)]
    pub order: i64,
    /// Creation time; absent on the seeded default folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<Timestamp>,
}

impl Folder {
    /// The folder every dataset starts with.
    #[must_use]
    pub fn default_folder() -> Self {
        Self {
            id: DEFAULT_FOLDER_ID.to_string(),
            name: "Default".to_string(),
            order: 0,
            created_at: None,
            modified_at: None,
        }
    }

    /// Whether this is the undeletable default folder.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_FOLDER_ID
    }
}

/// A saved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Unique identifier.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Target URL; the natural key used when merging imports.
    pub url: String,
    /// Owning folder.
    #[serde(default = "default_folder_id")]
    pub folder_id: String,
    /// Optional icon URL or glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Position within the folder.
    #[serde(default)]
    pub order: i64,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<Timestamp>,
}

impl Bookmark {
    /// Whether this bookmark was modified strictly after `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        match (&self.modified_at, &other.modified_at) {
            (Some(mine), Some(theirs)) => mine.is_later_than(theirs),
            _ => false,
        }
    }
}

/// The entire persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// All folders, in display order.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// All bookmarks.
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl Dataset {
    /// A fresh dataset holding only the default folder.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            folders: vec![Folder::default_folder()],
            bookmarks: Vec::new(),
        }
    }
}

/// Envelope produced by export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    /// The exported dataset.
    pub data: Dataset,
    /// When the export was taken.
    pub exported_at: Timestamp,
    /// Format version.
    pub version: String,
}

impl ExportEnvelope {
    /// Wrap a dataset with the current time and format version.
    #[must_use]
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            exported_at: Timestamp::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }
}

/// Import dataset as received, before its shape is checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportPayload {
    /// Incoming folders, if present.
    #[serde(default)]
    pub folders: Option<Vec<Folder>>,
    /// Incoming bookmarks, if present.
    #[serde(default)]
    pub bookmarks: Option<Vec<Bookmark>>,
}

impl ImportPayload {
    /// Require both sequences.
    ///
    /// # Errors
    /// Returns `MalformedImport` if either sequence is missing.
    pub fn into_dataset(self) -> Result<Dataset> {
        match (self.folders, self.bookmarks) {
            (Some(folders), Some(bookmarks)) => Ok(Dataset { folders, bookmarks }),
            (None, _) => Err(AppError::malformed_import("missing folders")),
            (_, None) => Err(AppError::malformed_import("missing bookmarks")),
        }
    }
}

impl From<Dataset> for ImportPayload {
    fn from(dataset: Dataset) -> Self {
        Self {
            folders: Some(dataset.folders),
            bookmarks: Some(dataset.bookmarks),
        }
    }
}

/// Import body: an export envelope whose extra fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportEnvelope {
    /// The dataset to import.
    #[serde(default)]
    pub data: Option<ImportPayload>,
}

impl ImportEnvelope {
    /// Parse an envelope from JSON text.
    ///
    /// # Errors
    /// Returns `JsonParse` for invalid JSON, `MalformedImport` for a wrong shape.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(AppError::json_parse)?;
        Self::from_value(value)
    }

    /// Read an envelope from parsed JSON; a wrong shape is `MalformedImport`.
    ///
    /// # Errors
    /// Returns `MalformedImport` if `value` is not an import envelope.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| AppError::malformed_import(e.to_string()))
    }

    /// Unwrap the payload.
    ///
    /// # Errors
    /// Returns `MalformedImport` if `data` is missing.
    pub fn into_payload(self) -> Result<ImportPayload> {
        self.data
            .ok_or_else(|| AppError::malformed_import("missing data"))
    }
}

impl From<ExportEnvelope> for ImportEnvelope {
    fn from(envelope: ExportEnvelope) -> Self {
        Self {
            data: Some(envelope.data.into()),
        }
    }
}

/// How an import combines with the current dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStrategy {
    /// Discard the current dataset.
    Replace,
    /// Union folders by id, bookmarks by url with newest-wins.
    #[default]
    Merge,
}

impl std::str::FromStr for ImportStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "merge" => Ok(Self::Merge),
            _ => Err(AppError::UnknownStrategy {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Fields accepted when creating a bookmark.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Partial bookmark update; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Fields accepted when creating a folder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFolder {
    pub name: String,
}

/// Partial folder update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}
