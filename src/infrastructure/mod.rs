//! Infrastructure layer - external adapters (filesystem, network).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod json_store;
#[cfg(test)]
pub mod memory_store;
pub mod title_fetcher;

pub use config::{config_file_path, ensure_config_exists, load_config};
pub use json_store::{DatasetStore, JsonFileStore};
#[cfg(test)]
pub use memory_store::MemoryStore;
pub use title_fetcher::TitleFetcher;
