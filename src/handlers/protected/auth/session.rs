use axum::Extension;

use crate::handlers::public::auth::SessionInfo;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /api/session - Report the user bound to the current session
///
/// The session middleware has already rejected requests without a live
/// session (401) and slid the expiry of this one.
pub async fn session_check(Extension(auth): Extension<AuthUser>) -> ApiResult<SessionInfo> {
    Ok(ApiResponse::success(SessionInfo {
        uid: auth.user_id,
        usr: auth.username,
    }))
}
