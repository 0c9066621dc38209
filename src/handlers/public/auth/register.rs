// handlers/public/auth/register.rs - POST /api/registration handler

use axum::extract::State;
use tower_cookies::Cookies;

use super::utils::{start_session, Credentials, SessionInfo};
use crate::auth;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::AppState;

/// POST /api/registration - Create an account and log it in
///
/// Takes `{usr, pwd}`; returns `{uid, usr}` with the session cookie set.
/// A taken username is a 400.
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidJson(payload): ValidJson<Credentials>,
) -> ApiResult<SessionInfo> {
    if payload.usr.trim().is_empty() || payload.pwd.is_empty() {
        return Err(ApiError::bad_request("Username and password are required."));
    }

    if state.store.get_user(&payload.usr).await?.is_some() {
        return Err(ApiError::bad_request("Username already exists."));
    }

    let digest = auth::hash(&payload.pwd).map_err(|e| {
        tracing::error!("{}", e);
        ApiError::internal_server_error("Failed to store credentials")
    })?;

    // The store rejects a concurrent duplicate with a conflict (400)
    let user = state
        .store
        .add_user(&payload.usr, &digest.salt, &digest.hash)
        .await?;
    tracing::info!("Registered user '{}' ({})", user.username, user.id);

    let info = start_session(&state, &cookies, user.id, &user.username).await?;
    Ok(ApiResponse::success(info))
}
