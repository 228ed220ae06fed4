//! Bookmark Manager - save, organize and search bookmarks.
//!
//! Serves the bookmark dataset over a REST API and manages it from the
//! command line:
//!   bookmark-manager serve --port 3001
//!   bookmark-manager add https://example.com --folder work
//!   bookmark-manager search rust
//!   bookmark-manager export -o backup.json
//!   bookmark-manager import backup.json --strategy merge

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bookmark_manager::application::{
    format_bookmarks_table, format_folders_table, format_import_report, BookmarkService,
};
use bookmark_manager::cli::{Cli, Commands, StrategyArg};
use bookmark_manager::domain::{
    self, AppConfig, AppError, ImportEnvelope, ImportStrategy, NewBookmark, NewFolder,
};
use bookmark_manager::http::{self, AppState};
use bookmark_manager::infrastructure::{
    config_file_path, ensure_config_exists, load_config, JsonFileStore, TitleFetcher,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity; the server logs requests at info
    let serving = matches!(cli.command, Commands::Serve { .. });
    setup_logging(cli.verbose.saturating_add(u8::from(serving)));

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.data_file {
        config.storage.data_file = Some(path);
    }

    match cli.command {
        Commands::Serve { host, port } => cmd_serve(config, host, port),
        Commands::List { folder } => cmd_list(&config, folder.as_deref()),
        Commands::Folders => cmd_folders(&config),
        Commands::Search { query, folder } => cmd_search(&config, &query, folder.as_deref()),
        Commands::Add { url, title, folder } => cmd_add(&config, url, title, folder),
        Commands::Remove { id } => cmd_remove(&config, &id),
        Commands::Mkdir { name } => cmd_mkdir(&config, name),
        Commands::Rmdir { id } => cmd_rmdir(&config, &id),
        Commands::Export { output } => cmd_export(&config, output.as_deref()),
        Commands::Import { file, strategy } => cmd_import(&config, &file, strategy),
        Commands::Init => cmd_init(cli.config.as_deref()),
        Commands::Paths => cmd_paths(&config, cli.config.as_deref()),
    }
}

/// Open the configured data file.
fn open_service(config: &AppConfig) -> domain::Result<BookmarkService> {
    let store = JsonFileStore::open(&config.data_file())?;
    Ok(BookmarkService::new(Arc::new(store)))
}

fn runtime() -> domain::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal {
            message: format!("Failed to start async runtime: {e}"),
        })
}

/// Run the REST API.
fn cmd_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> domain::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = open_service(&config)?;
    let titles = TitleFetcher::new(&config.fetch)?;
    tracing::info!(data_file = %config.data_file().display(), "Serving bookmarks");

    let state = AppState::new(service, titles);
    runtime()?.block_on(http::serve(&config.server.bind_addr(), state))
}

/// List bookmarks, optionally limited to one folder.
fn cmd_list(config: &AppConfig, folder: Option<&str>) -> domain::Result<()> {
    let dataset = open_service(config)?.dataset()?;

    let mut bookmarks: Vec<_> = dataset
        .bookmarks
        .iter()
        .filter(|b| folder.is_none_or(|f| b.folder_id == f))
        .cloned()
        .collect();
    bookmarks.sort_by_key(|b| b.order);

    if bookmarks.is_empty() {
        println!("{}", "No bookmarks yet.".dimmed());
        return Ok(());
    }

    println!("{}", format_bookmarks_table(&bookmarks, &dataset));
    println!("Total: {} bookmark(s)", bookmarks.len());
    Ok(())
}

/// List folders.
fn cmd_folders(config: &AppConfig) -> domain::Result<()> {
    let dataset = open_service(config)?.dataset()?;
    println!("{}", format_folders_table(&dataset.folders, &dataset));
    Ok(())
}

/// Search bookmarks.
fn cmd_search(config: &AppConfig, query: &str, folder: Option<&str>) -> domain::Result<()> {
    let service = open_service(config)?;
    let results = service.search(query, folder)?;

    if results.is_empty() {
        println!("{} No bookmarks match '{}'", "✗".yellow(), query);
        return Ok(());
    }

    let dataset = service.dataset()?;
    println!("{}", format_bookmarks_table(&results, &dataset));
    println!("{} match(es)", results.len());
    Ok(())
}

/// Add a bookmark, fetching the page title when none is given.
fn cmd_add(
    config: &AppConfig,
    url: String,
    title: Option<String>,
    folder: Option<String>,
) -> domain::Result<()> {
    let service = open_service(config)?;

    let title = match title {
        Some(title) => title,
        None => {
            let fetcher = TitleFetcher::new(&config.fetch)?;
            let fetched = runtime()?.block_on(fetcher.fetch_title(&url));
            if fetched.is_empty() {
                url.clone()
            } else {
                fetched
            }
        }
    };

    let bookmark = service.create_bookmark(NewBookmark {
        title,
        url,
        folder_id: folder,
        icon: None,
    })?;

    println!(
        "{} Added {} ({})",
        "✓".green().bold(),
        bookmark.title.bold(),
        bookmark.id.dimmed()
    );
    Ok(())
}

/// Resolve a full id or a unique prefix of one.
fn resolve_bookmark_id(service: &BookmarkService, id: &str) -> domain::Result<String> {
    let dataset = service.dataset()?;
    if dataset.bookmarks.iter().any(|b| b.id == id) {
        return Ok(id.to_string());
    }

    let matches: Vec<&str> = dataset
        .bookmarks
        .iter()
        .filter(|b| b.id.starts_with(id))
        .map(|b| b.id.as_str())
        .collect();

    match matches.as_slice() {
        [only] => Ok((*only).to_string()),
        [] => Err(AppError::bookmark_not_found(id)),
        _ => Err(AppError::validation(format!(
            "Ambiguous id '{id}' matches {} bookmarks",
            matches.len()
        ))),
    }
}

/// Remove a bookmark.
fn cmd_remove(config: &AppConfig, id: &str) -> domain::Result<()> {
    let service = open_service(config)?;
    let id = resolve_bookmark_id(&service, id)?;
    let removed = service.delete_bookmark(&id)?;
    println!("{} Removed {}", "✓".green().bold(), removed.title.bold());
    Ok(())
}

/// Create a folder.
fn cmd_mkdir(config: &AppConfig, name: String) -> domain::Result<()> {
    let folder = open_service(config)?.create_folder(NewFolder { name })?;
    println!(
        "{} Created folder {} ({})",
        "✓".green().bold(),
        folder.name.bold(),
        folder.id.dimmed()
    );
    Ok(())
}

/// Delete a folder, moving its bookmarks to the default folder.
fn cmd_rmdir(config: &AppConfig, id: &str) -> domain::Result<()> {
    let moved = open_service(config)?.delete_folder(id)?;
    println!(
        "{} Deleted folder {}; {} bookmark(s) moved to the default folder",
        "✓".green().bold(),
        id,
        moved
    );
    Ok(())
}

/// Export to a file or stdout.
fn cmd_export(config: &AppConfig, output: Option<&Path>) -> domain::Result<()> {
    let envelope = open_service(config)?.export()?;
    let content = serde_json::to_string_pretty(&envelope).map_err(AppError::json_parse)?;

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| AppError::storage(path, "Failed to write export", e))?;
            println!(
                "{} Exported {} bookmark(s) to {}",
                "✓".green().bold(),
                envelope.data.bookmarks.len(),
                path.display()
            );
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Import a previously exported file.
fn cmd_import(config: &AppConfig, file: &Path, strategy: StrategyArg) -> domain::Result<()> {
    let strategy = ImportStrategy::from(strategy);

    let content = std::fs::read_to_string(file)
        .map_err(|e| AppError::storage(file, "Failed to read import file", e))?;
    let envelope = ImportEnvelope::from_json(&content)?;

    let report = open_service(config)?.import(envelope, strategy)?;
    println!("{}", format_import_report(strategy, &report));
    Ok(())
}

/// Write the default config file.
fn cmd_init(config_path: Option<&Path>) -> domain::Result<()> {
    let path = config_path.map_or_else(config_file_path, Path::to_path_buf);
    if ensure_config_exists(&path)? {
        println!("{} Wrote {}", "✓".green().bold(), path.display());
    } else {
        println!("{} already exists", path.display());
    }
    Ok(())
}

/// Show config and data file paths.
fn cmd_paths(config: &AppConfig, config_path: Option<&Path>) -> domain::Result<()> {
    let config_path = config_path.map_or_else(config_file_path, Path::to_path_buf);
    let data_file = config.data_file();

    let status = |exists: bool| if exists { "found".green() } else { "missing".yellow() };

    println!("{}", "📂 Bookmark Manager Paths".bold());
    println!();
    println!(
        "  config: {} [{}]",
        config_path.display(),
        status(config_path.exists())
    );
    println!(
        "  data:   {} [{}]",
        data_file.display(),
        status(data_file.exists())
    );
    println!();
    println!("  server: http://{}/api", config.server.bind_addr());

    Ok(())
}

/// Setup logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
