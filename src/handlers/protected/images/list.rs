use axum::{extract::State, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ImageView;
use crate::handlers::protected::utils::ensure_session_user;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListImagesRequest {
    pub uid: Uuid,
    pub pid: Uuid,
}

/**
 * POST /api/projects/images - Image metadata for one project (no bytes)
 *
 * Expected Output:
 * ```json
 * [{ "pid": "...", "uid": "...", "fnu": "token.cat.png", "url": "/api/image/token.cat.png", "coords": [] }]
 * ```
 */
pub async fn project_images(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidJson(payload): ValidJson<ListImagesRequest>,
) -> ApiResult<Vec<ImageView>> {
    ensure_session_user(&auth, payload.uid)?;

    let images = state.store.list_images(payload.uid, payload.pid).await?;

    Ok(ApiResponse::success(images.iter().map(ImageView::from).collect()))
}
