//! Import reconciliation.
//!
//! Combines the current dataset with an imported one. `replace` takes the
//! import verbatim. `merge` appends folders whose id is new (existing folders
//! are never touched) and matches bookmarks by url: unmatched bookmarks are
//! appended as-is, matched ones take the incoming fields only when the
//! incoming `modifiedAt` is strictly later, and always keep the existing id.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Bookmark, Dataset, ImportPayload, ImportStrategy, Result};

/// What a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Folders appended.
    pub folders_added: usize,
    /// Bookmarks appended.
    pub bookmarks_added: usize,
    /// Existing bookmarks overwritten by newer incoming ones.
    pub bookmarks_updated: usize,
    /// Incoming bookmarks ignored because they were not newer.
    pub bookmarks_skipped: usize,
}

/// Reconcile `incoming` into `current` and return the dataset to persist.
///
/// # Errors
/// Returns `MalformedImport` if `incoming` lacks either sequence.
pub fn reconcile(
    current: &Dataset,
    incoming: ImportPayload,
    strategy: ImportStrategy,
) -> Result<Dataset> {
    reconcile_with_report(current, incoming, strategy).map(|(dataset, _)| dataset)
}

/// Like [`reconcile`], also reporting what changed.
///
/// # Errors
/// Returns `MalformedImport` if `incoming` lacks either sequence.
pub fn reconcile_with_report(
    current: &Dataset,
    incoming: ImportPayload,
    strategy: ImportStrategy,
) -> Result<(Dataset, ReconcileReport)> {
    let incoming = incoming.into_dataset()?;

    match strategy {
        ImportStrategy::Replace => {
            let report = ReconcileReport {
                folders_added: incoming.folders.len(),
                bookmarks_added: incoming.bookmarks.len(),
                ..ReconcileReport::default()
            };
            Ok((incoming, report))
        }
        ImportStrategy::Merge => Ok(merge(current, incoming)),
    }
}

fn merge(current: &Dataset, incoming: Dataset) -> (Dataset, ReconcileReport) {
    let mut merged = current.clone();
    let mut report = ReconcileReport::default();

    let mut folder_ids: HashSet<String> = merged.folders.iter().map(|f| f.id.clone()).collect();
    for folder in incoming.folders {
        if folder_ids.insert(folder.id.clone()) {
            merged.folders.push(folder);
            report.folders_added += 1;
        }
    }

    // Later duplicates in `current` win the url slot.
    let mut by_url: HashMap<String, usize> = merged
        .bookmarks
        .iter()
        .enumerate()
        .map(|(index, b)| (b.url.clone(), index))
        .collect();

    for bookmark in incoming.bookmarks {
        match by_url.get(&bookmark.url) {
            None => {
                by_url.insert(bookmark.url.clone(), merged.bookmarks.len());
                merged.bookmarks.push(bookmark);
                report.bookmarks_added += 1;
            }
            Some(&index) => {
                let existing = &mut merged.bookmarks[index];
                if bookmark.is_newer_than(existing) {
                    overwrite_keeping_id(existing, bookmark);
                    report.bookmarks_updated += 1;
                } else {
                    report.bookmarks_skipped += 1;
                }
            }
        }
    }

    (merged, report)
}

fn overwrite_keeping_id(existing: &mut Bookmark, incoming: Bookmark) {
    let id = std::mem::take(&mut existing.id);
    *existing = Bookmark { id, ..incoming };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppError, Folder, Timestamp, DEFAULT_FOLDER_ID};
    use proptest::prelude::*;

    fn bookmark(id: &str, url: &str, modified: &str, title: &str) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            folder_id: DEFAULT_FOLDER_ID.to_string(),
            icon: None,
            order: 0,
            created_at: None,
            modified_at: Some(Timestamp::from(modified)),
        }
    }

    fn folder(id: &str, name: &str) -> Folder {
        Folder {
            id: id.to_string(),
            name: name.to_string(),
            order: 0,
            created_at: None,
            modified_at: None,
        }
    }

    fn dataset(folders: Vec<Folder>, bookmarks: Vec<Bookmark>) -> Dataset {
        Dataset { folders, bookmarks }
    }

    #[test]
    fn test_newer_import_keeps_existing_id() {
        let current = dataset(
            vec![Folder::default_folder()],
            vec![bookmark("1", "a.com", "2020-01-01", "Old")],
        );
        let incoming = dataset(
            vec![Folder::default_folder()],
            vec![bookmark("2", "a.com", "2021-01-01", "New")],
        );

        let merged = reconcile(&current, incoming.into(), ImportStrategy::Merge).unwrap();

        assert_eq!(merged.bookmarks.len(), 1);
        assert_eq!(merged.bookmarks[0].id, "1");
        assert_eq!(merged.bookmarks[0].title, "New");
        assert_eq!(
            merged.bookmarks[0].modified_at,
            Some(Timestamp::from("2021-01-01"))
        );
    }

    #[test]
    fn test_older_import_is_ignored() {
        let current = dataset(vec![], vec![bookmark("1", "a.com", "2021-01-01", "Current")]);
        let incoming = dataset(vec![], vec![bookmark("2", "a.com", "2020-01-01", "Stale")]);

        let (merged, report) =
            reconcile_with_report(&current, incoming.into(), ImportStrategy::Merge).unwrap();

        assert_eq!(merged, current);
        assert_eq!(report.bookmarks_skipped, 1);
    }

    #[test]
    fn test_timestamp_tie_keeps_current() {
        let current = dataset(vec![], vec![bookmark("1", "a.com", "2021-01-01", "Current")]);
        let incoming = dataset(vec![], vec![bookmark("2", "a.com", "2021-01-01", "Tie")]);

        let merged = reconcile(&current, incoming.into(), ImportStrategy::Merge).unwrap();
        assert_eq!(merged.bookmarks[0].title, "Current");
    }

    #[test]
    fn test_unparseable_timestamp_is_not_newer() {
        let current = dataset(vec![], vec![bookmark("1", "a.com", "2021-01-01", "Current")]);
        let incoming = dataset(vec![], vec![bookmark("2", "a.com", "not a date", "Odd")]);

        let merged = reconcile(&current, incoming.into(), ImportStrategy::Merge).unwrap();
        assert_eq!(merged.bookmarks[0].title, "Current");
    }

    #[test]
    fn test_unmatched_bookmarks_appended_with_own_id() {
        let current = dataset(vec![], vec![bookmark("1", "a.com", "2021-01-01", "A")]);
        let incoming = dataset(
            vec![],
            vec![
                bookmark("7", "b.com", "2020-01-01", "B"),
                bookmark("8", "c.com", "2020-01-01", "C"),
            ],
        );

        let merged = reconcile(&current, incoming.into(), ImportStrategy::Merge).unwrap();
        let ids: Vec<_> = merged.bookmarks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["1", "7", "8"]);
    }

    #[test]
    fn test_duplicate_incoming_urls_apply_in_sequence() {
        let current = dataset(vec![], vec![bookmark("1", "a.com", "2020-01-01", "Current")]);
        let incoming = dataset(
            vec![],
            vec![
                bookmark("2", "a.com", "2022-01-01", "First"),
                bookmark("3", "a.com", "2021-01-01", "Second"),
                bookmark("4", "b.com", "2020-01-01", "Fresh"),
                bookmark("5", "b.com", "2023-01-01", "Fresher"),
            ],
        );

        let merged = reconcile(&current, incoming.into(), ImportStrategy::Merge).unwrap();

        assert_eq!(merged.bookmarks.len(), 2);
        // Second a.com is older than the first one already applied.
        assert_eq!(merged.bookmarks[0].id, "1");
        assert_eq!(merged.bookmarks[0].title, "First");
        // b.com was appended, then overwritten with the appended record's id.
        assert_eq!(merged.bookmarks[1].id, "4");
        assert_eq!(merged.bookmarks[1].title, "Fresher");
    }

    #[test]
    fn test_folder_merge_is_strict_union() {
        let current = dataset(
            vec![Folder::default_folder(), folder("work", "Work")],
            vec![],
        );
        let incoming = dataset(
            vec![
                folder("work", "Renamed"),
                folder("fun", "Fun"),
                folder("fun", "Fun again"),
            ],
            vec![],
        );

        let (merged, report) =
            reconcile_with_report(&current, incoming.into(), ImportStrategy::Merge).unwrap();

        let names: Vec<_> = merged.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Default", "Work", "Fun"]);
        assert_eq!(report.folders_added, 1);
    }

    #[test]
    fn test_replace_returns_incoming_verbatim() {
        let current = dataset(
            vec![Folder::default_folder()],
            vec![bookmark("1", "a.com", "2021-01-01", "A")],
        );
        let incoming = dataset(
            vec![folder("x", "X")],
            vec![bookmark("9", "z.com", "2000-01-01", "Z")],
        );

        let replaced =
            reconcile(&current, incoming.clone().into(), ImportStrategy::Replace).unwrap();
        assert_eq!(replaced, incoming);
    }

    #[test]
    fn test_malformed_payload_rejected_for_both_strategies() {
        let current = Dataset::seeded();
        for strategy in [ImportStrategy::Merge, ImportStrategy::Replace] {
            let payload = ImportPayload {
                folders: Some(vec![]),
                bookmarks: None,
            };
            assert!(matches!(
                reconcile(&current, payload, strategy),
                Err(AppError::MalformedImport { .. })
            ));
        }
    }

    fn arb_bookmark() -> impl Strategy<Value = Bookmark> {
        (
            "[a-z]{1,4}",
            0usize..4,
            2019i32..2024,
            "[A-Za-z ]{0,8}",
        )
            .prop_map(|(id, url, year, title)| {
                bookmark(
                    &id,
                    &format!("https://site{url}.com"),
                    &format!("{year}-06-01"),
                    &title,
                )
            })
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        (
            prop::collection::vec("[a-c]", 0..4),
            prop::collection::vec(arb_bookmark(), 0..6),
        )
            .prop_map(|(folder_ids, bookmarks)| Dataset {
                folders: folder_ids.iter().map(|id| folder(id, id)).collect(),
                bookmarks,
            })
    }

    fn unique_urls(mut ds: Dataset) -> Dataset {
        let mut seen = HashSet::new();
        ds.bookmarks.retain(|b| seen.insert(b.url.clone()));
        ds
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(current in arb_dataset(), incoming in arb_dataset()) {
            let once = reconcile(&current, incoming.clone().into(), ImportStrategy::Merge).unwrap();
            let twice = reconcile(&once, incoming.into(), ImportStrategy::Merge).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merge_keeps_one_record_per_url(current in arb_dataset(), incoming in arb_dataset()) {
            let current = unique_urls(current);
            let merged = reconcile(&current, incoming.clone().into(), ImportStrategy::Merge).unwrap();

            let expected: HashSet<_> = current
                .bookmarks
                .iter()
                .chain(incoming.bookmarks.iter())
                .map(|b| b.url.clone())
                .collect();
            let urls: Vec<_> = merged.bookmarks.iter().map(|b| b.url.clone()).collect();
            let distinct: HashSet<_> = urls.iter().cloned().collect();

            prop_assert_eq!(urls.len(), distinct.len());
            prop_assert_eq!(distinct, expected);
        }

        #[test]
        fn merge_never_changes_existing_ids(current in arb_dataset(), incoming in arb_dataset()) {
            let current = unique_urls(current);
            let merged = reconcile(&current, incoming.into(), ImportStrategy::Merge).unwrap();
            for (before, after) in current.bookmarks.iter().zip(merged.bookmarks.iter()) {
                prop_assert_eq!(&before.id, &after.id);
                prop_assert_eq!(&before.url, &after.url);
            }
        }

        #[test]
        fn replace_ignores_current(current in arb_dataset(), incoming in arb_dataset()) {
            let replaced = reconcile(&current, incoming.clone().into(), ImportStrategy::Replace).unwrap();
            prop_assert_eq!(replaced, incoming);
        }
    }
}
