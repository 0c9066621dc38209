// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::State;
use tower_cookies::Cookies;

use super::utils::{start_session, Credentials, SessionInfo};
use crate::auth;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::AppState;

/**
 * POST /api/login - Authenticate a user and open a session
 *
 * Expected Input:
 * ```json
 * { "usr": "string", "pwd": "string" }
 * ```
 *
 * Expected Output (Success), with the session cookie set:
 * ```json
 * { "uid": "user_uuid", "usr": "string" }
 * ```
 *
 * 400 when the username is unknown, 401 when the password does not match.
 */
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidJson(payload): ValidJson<Credentials>,
) -> ApiResult<SessionInfo> {
    let user = state
        .store
        .get_user(&payload.usr)
        .await?
        .ok_or_else(|| ApiError::bad_request("User not found."))?;

    if !auth::verify(&payload.pwd, &user.salt, &user.hash) {
        tracing::warn!("Failed login for user '{}'", user.username);
        return Err(ApiError::unauthorized("Username and password combo is invalid."));
    }

    let info = start_session(&state, &cookies, user.id, &user.username).await?;
    tracing::info!("User '{}' logged in", info.usr);

    Ok(ApiResponse::success(info))
}
