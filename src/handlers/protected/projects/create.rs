use axum::{extract::State, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ProjectView;
use crate::error::ApiError;
use crate::handlers::protected::utils::ensure_session_user;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProjectRequest {
    pub uid: Uuid,
    pub prj: String,
}

/**
 * POST /api/projects/create - Create a project for the session user
 *
 * Expected Input:
 * ```json
 * { "uid": "user_uuid", "prj": "Project title" }
 * ```
 *
 * Expected Output:
 * ```json
 * { "pid": "project_uuid", "uid": "user_uuid", "prj": "Project title" }
 * ```
 *
 * Titles are unique per user; a repeat is a 400.
 */
pub async fn project_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidJson(payload): ValidJson<CreateProjectRequest>,
) -> ApiResult<ProjectView> {
    ensure_session_user(&auth, payload.uid)?;

    if payload.prj.trim().is_empty() {
        return Err(ApiError::bad_request("Project title is required."));
    }

    if state.store.get_project(payload.uid, &payload.prj).await?.is_some() {
        return Err(ApiError::bad_request("A project with that name already exists."));
    }

    let project = state.store.add_project(payload.uid, &payload.prj).await?;
    tracing::info!("User {} created project '{}' ({})", auth.user_id, project.title, project.id);

    Ok(ApiResponse::success(ProjectView::from(&project)))
}
