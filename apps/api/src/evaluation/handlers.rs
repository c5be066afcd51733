//! Axum route handlers for resume evaluation.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::extract::is_allowed_content_type;
use crate::state::AppState;

/// Multipart field name the upload is expected under. Any part that carries a
/// filename is accepted as well, since browsers pick their own field names.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Echoed verbatim; empty when the part carried no filename.
    pub filename: String,
    pub score: u32,
    pub keywords: Vec<String>,
    pub summary: String,
}

/// POST /upload/
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) && field.file_name().is_none() {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = match field.content_type() {
            Some(ct) if is_allowed_content_type(ct) => ct.to_string(),
            other => return Err(AppError::InvalidFileType(other.map(str::to_string))),
        };

        let bytes = field.bytes().await?;
        info!(
            filename = filename.as_str(),
            content_type = content_type.as_str(),
            size = bytes.len(),
            "Resume received"
        );

        let result = state
            .evaluator
            .evaluate(bytes.to_vec(), &content_type)
            .await?;

        return Ok(Json(UploadResponse {
            filename,
            score: result.score,
            keywords: result.keywords,
            summary: result.summary,
        }));
    }

    Err(AppError::Validation("No file was uploaded".to_string()))
}
