use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned verbatim when an upload's declared type is not allowed.
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Invalid file type. Only PDF and TXT files are allowed.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid file type: {0:?}")]
    InvalidFileType(Option<String>),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Model inference failed: {0}")]
    ModelInference(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidFileType(content_type) => {
                tracing::debug!("Rejected upload with content type {content_type:?}");
                // Clients match on this flat shape, not the envelope below.
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": INVALID_FILE_TYPE_MESSAGE })),
                )
                    .into_response();
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Multipart(e) => (e.status(), "INVALID_UPLOAD", e.body_text()),
            AppError::MalformedDocument(msg) => {
                tracing::error!("Malformed document: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCUMENT_ERROR",
                    "The uploaded document could not be read".to_string(),
                )
            }
            AppError::ModelInference(msg) => {
                tracing::error!("Model inference error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
