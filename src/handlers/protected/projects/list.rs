use axum::{extract::State, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ProjectView;
use crate::handlers::protected::utils::ensure_session_user;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListProjectsRequest {
    pub uid: Uuid,
}

/// POST /api/projects/list - All projects of the session user, oldest first
pub async fn project_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidJson(payload): ValidJson<ListProjectsRequest>,
) -> ApiResult<Vec<ProjectView>> {
    ensure_session_user(&auth, payload.uid)?;

    let projects = state.store.list_projects(payload.uid).await?;

    Ok(ApiResponse::success(
        projects.iter().map(ProjectView::from).collect(),
    ))
}
