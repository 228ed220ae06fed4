//! REST API over the bookmark service.
//!
//! All routes live under `/api`. Errors are returned as `{"error": "..."}`
//! with the status from [`error::status_for`].

pub mod error;
pub mod handlers;
pub mod middleware;

use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::BookmarkService;
use crate::domain::{AppError, Result};
use crate::infrastructure::TitleFetcher;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: BookmarkService,
    pub titles: TitleFetcher,
}

impl AppState {
    /// Bundle the service and title fetcher.
    #[must_use]
    pub const fn new(service: BookmarkService, titles: TitleFetcher) -> Self {
        Self { service, titles }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/bookmarks",
            get(handlers::get_dataset).post(handlers::create_bookmark),
        )
        .route(
            "/bookmarks/{id}",
            put(handlers::update_bookmark).delete(handlers::delete_bookmark),
        )
        .route(
            "/folders",
            get(handlers::list_folders).post(handlers::create_folder),
        )
        .route(
            "/folders/{id}",
            put(handlers::update_folder).delete(handlers::delete_folder),
        )
        .route("/export", post(handlers::export))
        .route("/import", post(handlers::import))
        .route("/fetch-title", get(handlers::fetch_title))
        .route("/search", get(handlers::search));

    Router::new()
        .nest("/api", api)
        .layer(from_fn(middleware::cors_middleware))
        .layer(from_fn(middleware::request_logging_middleware))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
/// Returns `Config` if the address cannot be bound, `Internal` if the server
/// fails while running.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| AppError::Config {
        message: format!("Failed to bind {addr}: {e}"),
    })?;

    let local = listener.local_addr().map_err(|e| AppError::Config {
        message: format!("Failed to read bound address: {e}"),
    })?;
    tracing::info!(%local, "Server running on http://{local}");
    tracing::info!("API endpoints available at http://{local}/api");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Server failed: {e}"),
        })
}
