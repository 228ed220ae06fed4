//! Request handlers for the `/api` routes.
//!
//! Bodies are parsed into typed inputs here; anything that doesn't fit is
//! rejected with 400 before it reaches the service.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::BookmarkService;
use crate::domain::{
    AppError, BookmarkPatch, FolderPatch, ImportEnvelope, ImportStrategy, NewBookmark, NewFolder,
    Result,
};

use super::AppState;

/// Run a service call on the blocking pool; storage is synchronous file I/O.
async fn blocking<T, F>(state: &AppState, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&BookmarkService) -> Result<T> + Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Worker task failed: {e}"),
        })?
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

pub async fn get_dataset(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let dataset = blocking(&state, BookmarkService::dataset).await?;
    Ok(Json(dataset))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewBookmark>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let input = body(payload)?;
    let bookmark = blocking(&state, move |svc| svc.create_bookmark(input)).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<BookmarkPatch>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let patch = body(payload)?;
    let bookmark = blocking(&state, move |svc| svc.update_bookmark(&id, patch)).await?;
    Ok(Json(bookmark))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    blocking(&state, move |svc| svc.delete_bookmark(&id)).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn list_folders(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let folders = blocking(&state, BookmarkService::folders).await?;
    Ok(Json(folders))
}

pub async fn create_folder(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewFolder>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let input = body(payload)?;
    let folder = blocking(&state, move |svc| svc.create_folder(input)).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<FolderPatch>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let patch = body(payload)?;
    let folder = blocking(&state, move |svc| svc.update_folder(&id, patch)).await?;
    Ok(Json(folder))
}

pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let moved = blocking(&state, move |svc| svc.delete_folder(&id)).await?;
    Ok(Json(json!({ "success": true, "reassigned": moved })))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let envelope = blocking(&state, BookmarkService::export).await?;
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    strategy: Option<String>,
}

pub async fn import(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let strategy = match query.strategy.as_deref() {
        None | Some("") => ImportStrategy::default(),
        Some(raw) => raw.parse()?,
    };

    let raw = payload.map_err(|rejection| AppError::malformed_import(rejection.body_text()))?;
    let envelope = ImportEnvelope::from_value(raw.0)?;

    let report = blocking(&state, move |svc| svc.import(envelope, strategy)).await?;
    Ok(Json(json!({
        "success": true,
        "strategy": strategy,
        "report": report,
    })))
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    url: Option<String>,
}

pub async fn fetch_title(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> Result<impl IntoResponse> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::validation("URL is required"))?;

    let title = state.titles.fetch_title(url.trim()).await;
    Ok(Json(json!({ "title": title })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    folder_id: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let results = blocking(&state, move |svc| {
        svc.search(&query.q, query.folder_id.as_deref())
    })
    .await?;
    Ok(Json(results))
}
