//! Application layer - use cases and orchestration.
//!
//! This layer contains import reconciliation, search, the bookmark
//! service and CLI output formatting.

pub mod bookmark_service;
pub mod formatter;
pub mod reconcile;
pub mod search;

pub use bookmark_service::BookmarkService;
pub use formatter::{format_bookmarks_table, format_folders_table, format_import_report};
pub use reconcile::{reconcile, reconcile_with_report, ReconcileReport};
pub use search::{extract_domain, fuzzy_match, search_bookmarks};
