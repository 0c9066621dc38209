use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::database::models::ImageUpdate;
use crate::error::ApiError;
use crate::files::secure_filename;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateImageRequest {
    pub fnu: String,
    pub doc: ImageUpdate,
}

#[derive(Debug, Serialize)]
pub struct UpdateImageResponse {
    pub updated: bool,
}

/**
 * POST /api/projects/update - Replace the annotation coords of an image
 *
 * Expected Input:
 * ```json
 * { "fnu": "token.cat.png", "doc": { "coords": [...] } }
 * ```
 *
 * `doc` only accepts `coords`; other keys are a 400. Unknown files are a 404.
 * Concurrent updates are last-write-wins.
 */
pub async fn update_image(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UpdateImageRequest>,
) -> ApiResult<UpdateImageResponse> {
    let file_unique = secure_filename(&payload.fnu);
    if file_unique.is_empty() {
        return Err(ApiError::not_found("Invalid file."));
    }

    state
        .store
        .update_image(&file_unique, &payload.doc)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid file."))?;

    Ok(ApiResponse::success(UpdateImageResponse { updated: true }))
}
