//! Terminal output for the CLI.
//!
//! Tables for bookmarks and folders, and a one-line import summary.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{Bookmark, Dataset, Folder, ImportStrategy};

use super::reconcile::ReconcileReport;

/// Formats a table of bookmarks, resolving folder names from `dataset`.
pub fn format_bookmarks_table(bookmarks: &[Bookmark], dataset: &Dataset) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "URL", "Folder", "Modified"]);

    for bookmark in bookmarks {
        let folder = dataset
            .folders
            .iter()
            .find(|f| f.id == bookmark.folder_id)
            .map_or(bookmark.folder_id.as_str(), |f| f.name.as_str());

        let modified = bookmark
            .modified_at
            .as_ref()
            .and_then(crate::domain::Timestamp::instant)
            .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string());

        table.add_row(vec![
            short_id(&bookmark.id),
            truncate(&bookmark.title, 35),
            truncate(&bookmark.url, 45),
            folder.to_string(),
            modified,
        ]);
    }

    table.to_string()
}

/// Formats a table of folders with their bookmark counts.
pub fn format_folders_table(folders: &[Folder], dataset: &Dataset) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Order", "Bookmarks"]);

    let mut sorted: Vec<&Folder> = folders.iter().collect();
    sorted.sort_by_key(|f| f.order);

    for folder in sorted {
        table.add_row(vec![
            folder.id.clone(),
            folder.name.clone(),
            folder.order.to_string(),
            dataset.bookmarks_in(&folder.id).count().to_string(),
        ]);
    }

    table.to_string()
}

/// Formats the outcome of an import.
pub fn format_import_report(strategy: ImportStrategy, report: &ReconcileReport) -> String {
    match strategy {
        ImportStrategy::Replace => format!(
            "{} Replaced dataset: {} folders, {} bookmarks",
            "✓".green().bold(),
            report.folders_added.to_string().cyan(),
            report.bookmarks_added.to_string().cyan()
        ),
        ImportStrategy::Merge => format!(
            "{} Merged: +{} folders, +{} bookmarks, {} updated, {} unchanged",
            "✓".green().bold(),
            report.folders_added.to_string().cyan(),
            report.bookmarks_added.to_string().cyan(),
            report.bookmarks_updated.to_string().yellow(),
            report.bookmarks_skipped
        ),
    }
}

/// First 8 characters of an id.
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
