use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::files::{allowed_ext, mime_for, secure_filename};
use crate::AppState;

/// GET /api/image/*path - Stream the stored bytes of an uploaded image
///
/// The extension is checked before sanitizing (400), the sanitized name is
/// the object store key (404 when absent). Content-Type is the mimetype
/// recorded at upload.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    if !allowed_ext(&path) {
        return Err(ApiError::bad_request("Invalid filename."));
    }

    let filename = secure_filename(&path);
    if mime_for(&filename).is_none() {
        return Err(ApiError::bad_request("Invalid filename."));
    }

    let blob = state
        .store
        .get_image_bytes(&filename)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found."))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, blob.mimetype),
            (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", filename)),
        ],
        Body::from(blob.data),
    )
        .into_response())
}
