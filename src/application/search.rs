//! Bookmark search.
//!
//! Matching is a case-insensitive subsequence test against the title, the
//! url and the url's host.

use url::Url;

use crate::domain::{Bookmark, Dataset};

/// True if every character of `query` (whitespace removed) appears in `text`
/// in order.
#[must_use]
pub fn fuzzy_match(query: &str, text: &str) -> bool {
    if query.is_empty() || text.is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    let mut haystack = text.chars();
    query
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|needle| haystack.any(|c| c == needle))
}

/// Host part of `url`, or an empty string if it doesn't parse.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn matches(query: &str, bookmark: &Bookmark) -> bool {
    fuzzy_match(query, &bookmark.title)
        || fuzzy_match(query, &bookmark.url)
        || fuzzy_match(query, &extract_domain(&bookmark.url))
}

/// Search bookmarks, sorted by `order`.
///
/// A non-empty query searches every folder. An empty query lists `folder`
/// (or everything when no folder is given).
#[must_use]
pub fn search_bookmarks(dataset: &Dataset, query: &str, folder: Option<&str>) -> Vec<Bookmark> {
    let query = query.trim();
    let mut results: Vec<Bookmark> = dataset
        .bookmarks
        .iter()
        .filter(|b| {
            if query.is_empty() {
                folder.is_none_or(|id| b.folder_id == id)
            } else {
                matches(query, b)
            }
        })
        .cloned()
        .collect();

    results.sort_by_key(|b| b.order);
    results
}
