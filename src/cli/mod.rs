//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::ImportStrategy;

/// Bookmark Manager - save, organize and search bookmarks.
///
/// Run `bookmark-manager serve` for the REST API, or manage the data file
/// directly with the other commands.
#[derive(Parser, Debug)]
#[command(name = "bookmark-manager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to ~/.bookmark-manager/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file, overriding the configured one.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the REST API server.
    Serve {
        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List bookmarks.
    List {
        /// Only bookmarks in this folder.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// List folders with bookmark counts.
    Folders,

    /// Fuzzy-search titles and URLs.
    Search {
        /// Search text.
        query: String,

        /// Folder to list when the query is empty.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Add a bookmark (the page title is fetched when --title is omitted).
    Add {
        /// Target URL.
        url: String,

        /// Title to store.
        #[arg(short, long)]
        title: Option<String>,

        /// Folder id.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Remove a bookmark by id (full or unique prefix).
    Remove {
        /// Bookmark ID.
        id: String,
    },

    /// Create a folder.
    Mkdir {
        /// Folder name.
        name: String,
    },

    /// Delete a folder; its bookmarks move to the default folder.
    Rmdir {
        /// Folder ID.
        id: String,
    },

    /// Export the dataset as a versioned envelope.
    Export {
        /// Output file path (stdout if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import an exported file.
    Import {
        /// File produced by `export` (or the web client).
        file: PathBuf,

        /// How the file combines with the stored bookmarks.
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Merge)]
        strategy: StrategyArg,
    },

    /// Write the default configuration file if none exists.
    Init,

    /// Show configuration and data file locations.
    Paths,
}

/// `--strategy` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    /// Keep existing data; newer bookmarks win by url.
    Merge,
    /// Discard existing data.
    Replace,
}

impl From<StrategyArg> for ImportStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Merge => Self::Merge,
            StrategyArg::Replace => Self::Replace,
        }
    }
}
