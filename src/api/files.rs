//! File store API handlers
//!
//! Provides HTTP endpoints for uploading, listing, downloading, and deleting
//! participant CSV files. Uses the store service layer for filesystem work.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to upload a CSV payload
///
/// Both fields are declared up front; `csv_data` is optional in shape only so
/// that a missing field reports the same client error as an empty one.
#[derive(Deserialize)]
pub struct UploadCsvRequest {
    /// Identifier of the participant this upload belongs to
    pub participant_id: Option<String>,
    /// Raw CSV text to persist
    pub csv_data: Option<String>,
}

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadCsvResponse {
    /// Status indicator, always "ok" on success
    pub status: String,
    /// Generated filename
    pub filename: String,
    /// Storage path of the written file
    pub path: String,
}

/// Response for listing files
#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    /// Filenames in the storage directory, sorted ascending
    pub files: Vec<String>,
    /// Total number of files
    pub count: usize,
}

/// Response for a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteFileResponse {
    /// Status indicator, always "ok" on success
    pub status: String,
    /// Human-readable description of what was removed
    pub detail: String,
}

/// POST /upload_csv - Persist one CSV payload
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UploadCsvRequest>,
) -> Result<Json<UploadCsvResponse>, AppError> {
    let csv_data = request.csv_data.as_deref().unwrap_or_default();
    if csv_data.is_empty() {
        return Err(AppError::EmptyCsvData);
    }

    // Absent participant id falls back to "unknown", matching the upload contract
    let participant_id = request.participant_id.as_deref().unwrap_or("unknown");

    let saved = state.store().save(participant_id, csv_data).await?;
    tracing::info!(filename = %saved.filename, "Stored CSV upload");

    Ok(Json(UploadCsvResponse {
        status: "ok".to_string(),
        filename: saved.filename,
        path: saved.path.display().to_string(),
    }))
}

/// GET /list_files - List stored filenames
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListFilesResponse>, AppError> {
    let files = state.store().list().await?;

    Ok(Json(ListFilesResponse {
        count: files.len(),
        files,
    }))
}

/// GET /download_csv/:filename - Stream a stored file back to the caller
pub async fn download_csv(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.store().open(&filename).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, bytes).into_response())
}

/// DELETE /delete_csv/:filename - Remove a stored file
pub async fn delete_csv(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteFileResponse>, AppError> {
    state.store().remove(&filename).await?;
    tracing::info!(filename = %filename, "Deleted stored CSV");

    Ok(Json(DeleteFileResponse {
        status: "ok".to_string(),
        detail: format!("Deleted {}", filename),
    }))
}
