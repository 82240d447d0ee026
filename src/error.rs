//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload request carried no CSV content
    #[error("No CSV data provided")]
    EmptyCsvData,

    /// Participant ID contains characters outside `[A-Za-z0-9_-]`
    #[error("Invalid participant_id format")]
    InvalidParticipantId,

    /// Requested filename does not end in `.csv`
    #[error("Invalid file type")]
    InvalidFileType,

    /// Filename contains path separators or traversal sequences
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Requested file does not exist in the storage directory
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Underlying filesystem operation failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::EmptyCsvData => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidParticipantId => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidFileType => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidFilename(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::FileNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
