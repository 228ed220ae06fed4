//! Bookmark Manager - personal bookmarks with folders, search and JSON
//! import/export.
//!
//! The dataset lives in a single JSON file. It is served over a small REST
//! API (`http`) and managed from the command line (`cli`).

pub mod application;
pub mod cli;
pub mod domain;
pub mod http;
pub mod infrastructure;
